//! Derived axes, the stability metric and the 16-way profile code.
//!
//! Four axes are derived from the trait percentages:
//!
//! | Axis | Formula | Reads as |
//! |------|---------|----------|
//! | `SE` | `E` | social energy |
//! | `ST` | `C` | structure |
//! | `OR` | `(A + (100 - O)) / 2` | people vs ideas orientation |
//! | `SB` | `100 - N` | calm vs reactive |
//!
//! **Stability** is the mean distance of the axes from the midpoint. It
//! measures how decisive a profile is, not how calm the person is; the
//! calmness figure shown to users is [`crate::display::emotional_stability`].
//!
//! ## Profile code table
//!
//! Each axis contributes one bit, `SE` most significant, then `ST`, `OR`,
//! `SB`. A bit is set when the axis sits strictly above the midpoint, so a
//! perfectly neutral profile is all zeros.
//!
//! | SE ST OR SB | Code |     | SE ST OR SB | Code |
//! |-------------|------|-----|-------------|------|
//! | 0  0  0  0  | P01  |     | 1  0  0  0  | P09  |
//! | 0  0  0  1  | P02  |     | 1  0  0  1  | P10  |
//! | 0  0  1  0  | P03  |     | 1  0  1  0  | P11  |
//! | 0  0  1  1  | P04  |     | 1  0  1  1  | P12  |
//! | 0  1  0  0  | P05  |     | 1  1  0  0  | P13  |
//! | 0  1  0  1  | P06  |     | 1  1  0  1  | P14  |
//! | 0  1  1  0  | P07  |     | 1  1  1  0  | P15  |
//! | 0  1  1  1  | P08  |     | 1  1  1  1  | P16  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scoring::TraitScores;

/// Neutral point of every percentage scale.
pub const MIDPOINT: f64 = 50.0;

/// The four derived axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    #[serde(rename = "SE")]
    pub social_energy: f64,
    #[serde(rename = "ST")]
    pub structure: f64,
    #[serde(rename = "OR")]
    pub orientation: f64,
    #[serde(rename = "SB")]
    pub calm: f64,
}

impl Axes {
    pub fn from_scores(scores: &TraitScores) -> Self {
        Self {
            social_energy: scores.extraversion,
            structure: scores.conscientiousness,
            orientation: (scores.agreeableness + (100.0 - scores.openness)) / 2.0,
            calm: 100.0 - scores.neuroticism,
        }
    }

    /// Axis values in bit order (`SE`, `ST`, `OR`, `SB`).
    pub fn values(&self) -> [f64; 4] {
        [
            self.social_energy,
            self.structure,
            self.orientation,
            self.calm,
        ]
    }

    /// Mean absolute distance from the midpoint, in [0, 100].
    pub fn stability(&self) -> f64 {
        let values = self.values();
        let total: f64 = values.iter().map(|v| (v - MIDPOINT).abs()).sum();
        (total / values.len() as f64).clamp(0.0, 100.0)
    }
}

/// How an axis value becomes a profile bit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileRule {
    /// Set when the axis is above the midpoint.
    #[default]
    Midpoint,
    /// Set at or above `upper`, clear at or below `lower`, midpoint rule
    /// in between.
    Deadzone { lower: f64, upper: f64 },
}

impl ProfileRule {
    /// Deadzone with the usual 45/55 bounds.
    pub fn standard_deadzone() -> Self {
        ProfileRule::Deadzone {
            lower: 45.0,
            upper: 55.0,
        }
    }

    pub fn bit(&self, axis: f64) -> bool {
        match *self {
            ProfileRule::Midpoint => axis > MIDPOINT,
            ProfileRule::Deadzone { lower, upper } => {
                if axis >= upper {
                    true
                } else if axis <= lower {
                    false
                } else {
                    axis > MIDPOINT
                }
            }
        }
    }

    /// Four-bit pattern for `axes`, `SE` in bit 3.
    pub fn pattern(&self, axes: &Axes) -> u8 {
        axes.values()
            .iter()
            .fold(0u8, |acc, &v| (acc << 1) | u8::from(self.bit(v)))
    }

    pub fn classify(&self, axes: &Axes) -> ProfileCode {
        PROFILE_TABLE[usize::from(self.pattern(axes))]
    }
}

/// One of the sixteen profile codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProfileCode {
    P01,
    P02,
    P03,
    P04,
    P05,
    P06,
    P07,
    P08,
    P09,
    P10,
    P11,
    P12,
    P13,
    P14,
    P15,
    P16,
}

/// Profile code by bit pattern, see the module table.
pub const PROFILE_TABLE: [ProfileCode; 16] = [
    ProfileCode::P01,
    ProfileCode::P02,
    ProfileCode::P03,
    ProfileCode::P04,
    ProfileCode::P05,
    ProfileCode::P06,
    ProfileCode::P07,
    ProfileCode::P08,
    ProfileCode::P09,
    ProfileCode::P10,
    ProfileCode::P11,
    ProfileCode::P12,
    ProfileCode::P13,
    ProfileCode::P14,
    ProfileCode::P15,
    ProfileCode::P16,
];

impl ProfileCode {
    /// All codes, P01 first.
    pub fn all() -> &'static [ProfileCode; 16] {
        &PROFILE_TABLE
    }

    /// 1-based number (P01 => 1).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Bit pattern that maps to this code.
    pub fn pattern(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| PROFILE_TABLE.get(usize::from(i)))
            .copied()
    }

    /// Avatar slot for the result page (P01 => 0 ... P16 => 15).
    pub fn avatar_index(self) -> usize {
        usize::from(self.pattern())
    }

    pub fn as_str(self) -> &'static str {
        const NAMES: [&str; 16] = [
            "P01", "P02", "P03", "P04", "P05", "P06", "P07", "P08", "P09", "P10", "P11", "P12",
            "P13", "P14", "P15", "P16",
        ];
        NAMES[usize::from(self.pattern())]
    }
}

impl fmt::Display for ProfileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidProfileCode(s.to_string());
        let digits = s.strip_prefix('P').ok_or_else(invalid)?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n: u8 = digits.parse().map_err(|_| invalid())?;
        Self::from_number(n).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ProfileCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProfileCode> for String {
    fn from(code: ProfileCode) -> Self {
        code.as_str().to_string()
    }
}
