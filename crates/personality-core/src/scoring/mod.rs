//! Big Five scoring.
//!
//! Answers are positional: `answers[i]` belongs to the `i`-th question of
//! the order the test was taken in. The scorer resolves that order through
//! [`questions_from_order`] before attributing anything to a trait, so the
//! order used for collection and the order used for scoring are always the
//! same sequence.
//!
//! Per question, an answer `a` in 1..=5 maps linearly onto 0..=100 and is
//! inverted for reverse-keyed questions. A trait score is the mean over its
//! answered questions; answers off the scale are skipped, and a trait with
//! nothing counted sits at the neutral 50.

pub mod addons;
pub mod profile;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::questions::{is_valid_answer, Question, Trait};
use crate::result::{StoredResult, RESULT_VERSION};
use crate::shuffle::questions_from_order;

pub use addons::{AddOns, ModeKey, StressKey, SubtypeKey};
pub use profile::{Axes, ProfileCode, ProfileRule, MIDPOINT, PROFILE_TABLE};

/// Percentage per trait, keyed `E/O/C/A/N` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    #[serde(rename = "E")]
    pub extraversion: f64,
    #[serde(rename = "O")]
    pub openness: f64,
    #[serde(rename = "C")]
    pub conscientiousness: f64,
    #[serde(rename = "A")]
    pub agreeableness: f64,
    #[serde(rename = "N")]
    pub neuroticism: f64,
}

impl TraitScores {
    /// Every trait at the midpoint.
    pub fn neutral() -> Self {
        Self {
            extraversion: MIDPOINT,
            openness: MIDPOINT,
            conscientiousness: MIDPOINT,
            agreeableness: MIDPOINT,
            neuroticism: MIDPOINT,
        }
    }

    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Extraversion => self.extraversion,
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    fn set(&mut self, t: Trait, value: f64) {
        match t {
            Trait::Extraversion => self.extraversion = value,
            Trait::Openness => self.openness = value,
            Trait::Conscientiousness => self.conscientiousness = value,
            Trait::Agreeableness => self.agreeableness = value,
            Trait::Neuroticism => self.neuroticism = value,
        }
    }

    /// `(trait, score)` pairs in bank order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        Trait::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    /// Whether every score is a finite percentage.
    pub fn is_well_formed(&self) -> bool {
        self.iter()
            .all(|(_, v)| v.is_finite() && (0.0..=100.0).contains(&v))
    }
}

/// Normalized score of one answer, or `None` when the answer is off the scale.
pub fn question_score(question: &Question, answer: i64) -> Option<f64> {
    if !is_valid_answer(answer) {
        return None;
    }
    let base = (answer - 1) as f64 / 4.0 * 100.0;
    let score = if question.reverse { 100.0 - base } else { base };
    Some(score.clamp(0.0, 100.0))
}

/// Trait averages for answers aligned with `questions`.
pub fn trait_scores<A>(questions: &[Question], answers: &[A]) -> TraitScores
where
    A: Copy + Into<i64>,
{
    let mut sums = [0.0f64; 5];
    let mut counts = [0usize; 5];

    for (question, &answer) in questions.iter().zip(answers) {
        let Some(score) = question_score(question, answer.into()) else {
            continue;
        };
        let slot = trait_slot(question.trait_code);
        sums[slot] += score;
        counts[slot] += 1;
    }

    let mut scores = TraitScores::neutral();
    for t in Trait::ALL {
        let slot = trait_slot(t);
        if counts[slot] > 0 {
            scores.set(t, (sums[slot] / counts[slot] as f64).clamp(0.0, 100.0));
        }
    }
    scores
}

fn trait_slot(t: Trait) -> usize {
    match t {
        Trait::Extraversion => 0,
        Trait::Openness => 1,
        Trait::Conscientiousness => 2,
        Trait::Agreeableness => 3,
        Trait::Neuroticism => 4,
    }
}

/// Everything derived from one answer vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub scores: TraitScores,
    pub axes: Axes,
    /// Decisiveness: mean axis distance from the midpoint.
    pub stability: f64,
    pub type_code: ProfileCode,
    pub add_ons: AddOns,
}

impl ScoreCard {
    pub fn from_scores(scores: TraitScores, rule: &ProfileRule) -> Self {
        let axes = Axes::from_scores(&scores);
        Self {
            scores,
            axes,
            stability: axes.stability(),
            type_code: rule.classify(&axes),
            add_ons: AddOns::from_scores(&scores),
        }
    }
}

/// Scores answer vectors under a fixed profile rule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scorer {
    rule: ProfileRule,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(rule: ProfileRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ProfileRule {
        self.rule
    }

    /// Score `answers` collected under `question_order`.
    pub fn score<A, S>(&self, answers: &[A], question_order: Option<&[S]>) -> ScoreCard
    where
        A: Copy + Into<i64>,
        S: AsRef<str>,
    {
        let questions = questions_from_order(question_order);
        ScoreCard::from_scores(trait_scores(&questions, answers), &self.rule)
    }

    /// Build the stored record, stamped with `created_at`.
    pub fn compute_result_at<A, S>(
        &self,
        answers: &[A],
        question_order: Option<&[S]>,
        created_at: DateTime<Utc>,
    ) -> StoredResult
    where
        A: Copy + Into<i64>,
        S: AsRef<str>,
    {
        let questions = questions_from_order(question_order);
        let card = ScoreCard::from_scores(trait_scores(&questions, answers), &self.rule);

        StoredResult {
            version: RESULT_VERSION.to_string(),
            created_at,
            answers: answers.iter().map(|&a| a.into()).collect(),
            question_order: Some(questions.iter().map(|q| q.id.to_string()).collect()),
            scores: card.scores,
            stability: card.stability,
            type_code: card.type_code,
            add_ons: Some(card.add_ons),
        }
    }

    /// Build the stored record, stamped now.
    pub fn compute_result<A, S>(&self, answers: &[A], question_order: Option<&[S]>) -> StoredResult
    where
        A: Copy + Into<i64>,
        S: AsRef<str>,
    {
        self.compute_result_at(answers, question_order, Utc::now())
    }
}

/// Score with the default midpoint rule and stamp the record now.
pub fn compute_result<A, S>(answers: &[A], question_order: Option<&[S]>) -> StoredResult
where
    A: Copy + Into<i64>,
    S: AsRef<str>,
{
    Scorer::new().compute_result(answers, question_order)
}
