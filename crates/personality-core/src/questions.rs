//! The fixed Big Five question bank.
//!
//! Twenty-five questions, five per trait, declared in canonical order
//! `E1..E5, O1..O5, C1..C5, A1..A5, N1..N5`. The fifth question of every
//! trait is reverse-keyed. Question text lives with the caller's
//! translations; the bank only carries ids and scoring metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lowest point of the answer scale.
pub const LIKERT_MIN: u8 = 1;
/// Highest point of the answer scale.
pub const LIKERT_MAX: u8 = 5;

/// Big Five trait dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
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

impl Trait {
    /// All traits in bank declaration order.
    pub const ALL: [Trait; 5] = [
        Trait::Extraversion,
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    /// Single-letter code used in ids and stored results.
    pub fn code(self) -> &'static str {
        match self {
            Trait::Extraversion => "E",
            Trait::Openness => "O",
            Trait::Conscientiousness => "C",
            Trait::Agreeableness => "A",
            Trait::Neuroticism => "N",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trait::Extraversion => "Extraversion",
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Trait {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" => Ok(Trait::Extraversion),
            "O" => Ok(Trait::Openness),
            "C" => Ok(Trait::Conscientiousness),
            "A" => Ok(Trait::Agreeableness),
            "N" => Ok(Trait::Neuroticism),
            other => Err(ValidationError::InvalidValue {
                field: "trait".to_string(),
                message: format!("unknown trait code '{other}'"),
            }),
        }
    }
}

/// A single scored question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    #[serde(rename = "trait")]
    pub trait_code: Trait,
    /// High agreement lowers the trait score.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
}

impl Question {
    const fn new(id: &'static str, trait_code: Trait) -> Self {
        Self {
            id,
            trait_code,
            reverse: false,
        }
    }

    const fn reversed(id: &'static str, trait_code: Trait) -> Self {
        Self {
            id,
            trait_code,
            reverse: true,
        }
    }
}

/// Number of questions in a full test.
pub const QUESTION_COUNT: usize = 25;

/// The question bank in canonical order.
pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    Question::new("E1", Trait::Extraversion),
    Question::new("E2", Trait::Extraversion),
    Question::new("E3", Trait::Extraversion),
    Question::new("E4", Trait::Extraversion),
    Question::reversed("E5", Trait::Extraversion),
    Question::new("O1", Trait::Openness),
    Question::new("O2", Trait::Openness),
    Question::new("O3", Trait::Openness),
    Question::new("O4", Trait::Openness),
    Question::reversed("O5", Trait::Openness),
    Question::new("C1", Trait::Conscientiousness),
    Question::new("C2", Trait::Conscientiousness),
    Question::new("C3", Trait::Conscientiousness),
    Question::new("C4", Trait::Conscientiousness),
    Question::reversed("C5", Trait::Conscientiousness),
    Question::new("A1", Trait::Agreeableness),
    Question::new("A2", Trait::Agreeableness),
    Question::new("A3", Trait::Agreeableness),
    Question::new("A4", Trait::Agreeableness),
    Question::reversed("A5", Trait::Agreeableness),
    Question::new("N1", Trait::Neuroticism),
    Question::new("N2", Trait::Neuroticism),
    Question::new("N3", Trait::Neuroticism),
    Question::new("N4", Trait::Neuroticism),
    Question::reversed("N5", Trait::Neuroticism),
];

/// Look up a question by id.
pub fn question_by_id(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Question ids in canonical order.
pub fn canonical_order() -> Vec<String> {
    QUESTIONS.iter().map(|q| q.id.to_string()).collect()
}

/// Whether `value` is a point on the answer scale.
pub fn is_valid_answer(value: i64) -> bool {
    (i64::from(LIKERT_MIN)..=i64::from(LIKERT_MAX)).contains(&value)
}
