//! Values the result page and report show to users.
//!
//! The display lists six rows, `S, E, O, C, A, N`, where `S` is emotional
//! stability (`100 - N`). That is a different quantity from the stored
//! `stability` field and is never written back into a result.

use serde::{Deserialize, Serialize};

use crate::questions::Trait;
use crate::scoring::TraitScores;

/// Row key on the result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayKey {
    #[serde(rename = "S")]
    EmotionalStability,
    #[serde(rename = "E")]
    Extraversion,
    #[serde(rename = "O")]
    Openness,
    #[serde(rename = "C")]
    Conscientiousness,
    #[serde(rename = "A")]
    Agreeableness,
    #[serde(rename = "N")]
    Neuroticism,
}

impl DisplayKey {
    /// Rows in display order.
    pub const ORDER: [DisplayKey; 6] = [
        DisplayKey::EmotionalStability,
        DisplayKey::Extraversion,
        DisplayKey::Openness,
        DisplayKey::Conscientiousness,
        DisplayKey::Agreeableness,
        DisplayKey::Neuroticism,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DisplayKey::EmotionalStability => "S",
            DisplayKey::Extraversion => "E",
            DisplayKey::Openness => "O",
            DisplayKey::Conscientiousness => "C",
            DisplayKey::Agreeableness => "A",
            DisplayKey::Neuroticism => "N",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayKey::EmotionalStability => "Emotional stability",
            other => other.as_trait().map(Trait::label).unwrap_or_default(),
        }
    }

    /// Underlying trait, `None` for the derived stability row.
    pub fn as_trait(self) -> Option<Trait> {
        match self {
            DisplayKey::EmotionalStability => None,
            DisplayKey::Extraversion => Some(Trait::Extraversion),
            DisplayKey::Openness => Some(Trait::Openness),
            DisplayKey::Conscientiousness => Some(Trait::Conscientiousness),
            DisplayKey::Agreeableness => Some(Trait::Agreeableness),
            DisplayKey::Neuroticism => Some(Trait::Neuroticism),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Upper bounds (inclusive, on the rounded percentage) of the low and
/// medium bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub low_max: u8,
    pub medium_max: u8,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            low_max: 33,
            medium_max: 66,
        }
    }
}

impl LevelThresholds {
    pub fn level(&self, value: f64) -> Level {
        let x = percent(value);
        if x <= self.low_max {
            Level::Low
        } else if x <= self.medium_max {
            Level::Medium
        } else {
            Level::High
        }
    }
}

/// Round to a whole percentage in 0..=100. Non-finite input reads as 0.
pub fn percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// The calmness figure users see, `100 - N`.
pub fn emotional_stability(scores: &TraitScores) -> f64 {
    100.0 - scores.neuroticism
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub key: DisplayKey,
    pub value: f64,
    pub level: Level,
}

/// The six display rows in `S, E, O, C, A, N` order.
pub fn display_rows(scores: &TraitScores, thresholds: &LevelThresholds) -> Vec<DisplayRow> {
    DisplayKey::ORDER
        .into_iter()
        .map(|key| {
            let value = match key.as_trait() {
                Some(t) => scores.get(t),
                None => emotional_stability(scores),
            };
            DisplayRow {
                key,
                value,
                level: thresholds.level(value),
            }
        })
        .collect()
}

/// Row with the largest value; the earliest row wins a tie.
pub fn highest_row(rows: &[DisplayRow]) -> Option<&DisplayRow> {
    rows.iter()
        .fold(None, |best: Option<&DisplayRow>, row| match best {
            Some(b) if row.value <= b.value => Some(b),
            _ => Some(row),
        })
}
