//! Test-taking progress.
//!
//! [`TestProgress`] is the state the test page keeps between answers: the
//! frozen question order, the answer slots (0 = unanswered), the current
//! position and the last-activity stamp used for expiry. Every transition
//! takes `now` from the caller; nothing here reads a clock or touches
//! storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::questions::{is_valid_answer, Question, QUESTION_COUNT};
use crate::result::StoredResult;
use crate::scoring::Scorer;
use crate::shuffle::{is_valid_order, make_question_order, questions_from_order};

/// Idle time after which stored progress is discarded.
pub const DEFAULT_PROGRESS_TTL_MINUTES: i64 = 30;

/// A fresh random seed for a new session.
pub fn new_seed() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Restore an answer vector from stored JSON.
///
/// Returns `None` unless `value` is an array of exactly `total` entries.
/// Entries that are not integers on the answer scale become 0; a
/// whole-valued float such as `3.0` counts as an integer.
pub fn normalize_answers(value: &serde_json::Value, total: usize) -> Option<Vec<u8>> {
    let items = value.as_array()?;
    if items.len() != total {
        return None;
    }
    Some(
        items
            .iter()
            .map(|v| match v.as_f64().filter(|f| f.fract() == 0.0) {
                Some(n) if is_valid_answer(n as i64) => n as u8,
                _ => 0,
            })
            .collect(),
    )
}

/// What happened after an answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move to this question index.
    Next(usize),
    /// Every question is answered and the last one was just confirmed.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestProgress {
    pub question_order: Vec<String>,
    pub answers: Vec<u8>,
    pub index: usize,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl TestProgress {
    /// Start a session with a fresh order for `seed`.
    pub fn start(seed: &str, max_same_trait_in_row: usize, now: DateTime<Utc>) -> Self {
        Self {
            question_order: make_question_order(seed, max_same_trait_in_row),
            answers: vec![0; QUESTION_COUNT],
            index: 0,
            last_active_at: Some(now),
        }
    }

    /// Rebuild a session from stored blobs.
    ///
    /// Stored answers are discarded when the session has expired, in which
    /// case the order is regenerated from `fresh_seed` too. A stored order
    /// that is not a permutation of the bank is replaced the same way.
    pub fn resume(
        stored_order: Option<&serde_json::Value>,
        stored_answers: Option<&serde_json::Value>,
        last_active_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        ttl: Duration,
        fresh_seed: &str,
        max_same_trait_in_row: usize,
    ) -> Self {
        let mut progress = Self::start(fresh_seed, max_same_trait_in_row, now);

        if stored_answers.is_some() && is_stale(last_active_at, now, ttl) {
            info!("stored progress expired, starting over with a new order");
            return progress;
        }

        let order: Option<Vec<String>> = stored_order
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .filter(|o: &Vec<String>| is_valid_order(o));
        match order {
            Some(order) => progress.question_order = order,
            None => debug!("no usable stored order, using a fresh one"),
        }

        if let Some(answers) = stored_answers.and_then(|v| normalize_answers(v, QUESTION_COUNT)) {
            progress.answers = answers;
            progress.index = progress.first_unanswered().unwrap_or(QUESTION_COUNT - 1);
            progress.last_active_at = last_active_at;
        }
        progress
    }

    /// Questions in the order this session presents them.
    pub fn questions(&self) -> Vec<Question> {
        questions_from_order(Some(&self.question_order[..]))
    }

    pub fn current_question(&self) -> Option<Question> {
        self.questions().get(self.index).copied()
    }

    /// Answer currently stored for the current question, 0 if none.
    pub fn current_answer(&self) -> u8 {
        self.answers.get(self.index).copied().unwrap_or(0)
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        self.answers.iter().position(|&a| a == 0)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|&&a| a != 0).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == QUESTION_COUNT
            && self.answers.iter().all(|&a| is_valid_answer(i64::from(a)))
    }

    /// Position through the test, as shown on the progress bar.
    pub fn progress_percent(&self) -> u8 {
        let total = self.answers.len();
        if total == 0 {
            return 0;
        }
        (((self.index + 1) as f64 / total as f64) * 100.0).round() as u8
    }

    /// Record `value` for the current question.
    ///
    /// Once every slot is filled the session walks forward one question at
    /// a time, reporting [`Advance::Complete`] on the last one; until then
    /// it jumps to the first gap.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AnswerOutOfRange`] if `value` is not 1-5.
    pub fn commit_answer(&mut self, value: i64, now: DateTime<Utc>) -> Result<Advance> {
        if !is_valid_answer(value) {
            return Err(ValidationError::AnswerOutOfRange {
                index: self.index,
                value,
            }
            .into());
        }
        let last = self.answers.len().saturating_sub(1);
        let slot = self.index.min(last);
        let Some(cell) = self.answers.get_mut(slot) else {
            return Err(ValidationError::InvalidValue {
                field: "answers".to_string(),
                message: "session has no answer slots".to_string(),
            }
            .into());
        };
        *cell = value as u8;
        self.last_active_at = Some(now);

        if self.is_complete() {
            if slot < last {
                self.index = slot + 1;
                return Ok(Advance::Next(self.index));
            }
            return Ok(Advance::Complete);
        }

        self.index = self.first_unanswered().unwrap_or(last);
        Ok(Advance::Next(self.index))
    }

    /// Step back one question. No-op on the first question.
    pub fn go_back(&mut self, now: DateTime<Utc>) {
        if self.index == 0 {
            return;
        }
        self.last_active_at = Some(now);
        self.index -= 1;
    }

    /// Clear all answers and draw a new order.
    pub fn reset(&mut self, seed: &str, max_same_trait_in_row: usize, now: DateTime<Utc>) {
        *self = Self::start(seed, max_same_trait_in_row, now);
    }

    /// Whether the session has been idle longer than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        is_stale(self.last_active_at, now, ttl)
    }

    /// Score the finished session under its own order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteAnswers`] unless every question
    /// has an answer.
    pub fn finish(&self, scorer: &Scorer, now: DateTime<Utc>) -> Result<StoredResult> {
        if !self.is_complete() {
            return Err(ValidationError::IncompleteAnswers {
                answered: self.answered_count(),
                total: QUESTION_COUNT,
            }
            .into());
        }
        Ok(scorer.compute_result_at(&self.answers[..], Some(&self.question_order[..]), now))
    }
}

fn is_stale(last_active_at: Option<DateTime<Utc>>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match last_active_at {
        None => true,
        Some(at) => now - at > ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-05-10T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ttl() -> Duration {
        Duration::minutes(DEFAULT_PROGRESS_TTL_MINUTES)
    }

    #[test]
    fn normalize_rejects_wrong_shape() {
        assert!(normalize_answers(&json!({"a": 1}), 3).is_none());
        assert!(normalize_answers(&json!([1, 2]), 3).is_none());
    }

    #[test]
    fn normalize_zeroes_bad_entries() {
        let v = json!([1, 5, 0, 6, 2.5, "3", null, -1, 4]);
        assert_eq!(
            normalize_answers(&v, 9),
            Some(vec![1, 5, 0, 0, 0, 0, 0, 0, 4])
        );
    }

    #[test]
    fn normalize_accepts_whole_floats() {
        let v = json!([3.0, 5.0, 1.5, 0.0, 6.0]);
        assert_eq!(normalize_answers(&v, 5), Some(vec![3, 5, 0, 0, 0]));
    }

    #[test]
    fn start_is_empty_with_valid_order() {
        let p = TestProgress::start("seed", 2, t0());
        assert!(is_valid_order(&p.question_order));
        assert_eq!(p.answers, vec![0; QUESTION_COUNT]);
        assert_eq!(p.index, 0);
        assert_eq!(p.progress_percent(), 4);
        assert!(!p.is_complete());
    }

    #[test]
    fn answering_jumps_to_first_gap() {
        let mut p = TestProgress::start("seed", 2, t0());
        p.index = 3;
        assert_eq!(p.commit_answer(4, t0()).unwrap(), Advance::Next(0));
        assert_eq!(p.answers[3], 4);
    }

    #[test]
    fn full_run_completes_on_last_question() {
        let mut p = TestProgress::start("seed", 2, t0());
        for i in 0..QUESTION_COUNT - 1 {
            assert_eq!(p.commit_answer(3, t0()).unwrap(), Advance::Next(i + 1));
        }
        assert_eq!(p.commit_answer(3, t0()).unwrap(), Advance::Complete);
        assert!(p.is_complete());
        assert_eq!(p.progress_percent(), 100);
    }

    #[test]
    fn revisiting_after_completion_walks_forward() {
        let mut p = TestProgress::start("seed", 2, t0());
        p.answers = vec![2; QUESTION_COUNT];
        p.index = 10;
        assert_eq!(p.commit_answer(5, t0()).unwrap(), Advance::Next(11));
    }

    #[test]
    fn rejects_off_scale_answer() {
        let mut p = TestProgress::start("seed", 2, t0());
        let err = p.commit_answer(7, t0()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::AnswerOutOfRange { index: 0, value: 7 })
        ));
        assert_eq!(p.answered_count(), 0);
    }

    #[test]
    fn go_back_stops_at_zero() {
        let mut p = TestProgress::start("seed", 2, t0());
        p.go_back(t0());
        assert_eq!(p.index, 0);
        p.index = 2;
        p.go_back(t0());
        assert_eq!(p.index, 1);
    }

    #[test]
    fn expiry() {
        let p = TestProgress::start("seed", 2, t0());
        assert!(!p.is_expired(t0() + Duration::minutes(30), ttl()));
        assert!(p.is_expired(t0() + Duration::minutes(31), ttl()));

        let mut stale = p.clone();
        stale.last_active_at = None;
        assert!(stale.is_expired(t0(), ttl()));
    }

    #[test]
    fn resume_restores_answers_and_order() {
        let order = make_question_order("original", 2);
        let mut answers = vec![3u8; QUESTION_COUNT];
        answers[7] = 0;
        let p = TestProgress::resume(
            Some(&json!(order)),
            Some(&json!(answers)),
            Some(t0()),
            t0() + Duration::minutes(5),
            ttl(),
            "fresh",
            2,
        );
        assert_eq!(p.question_order, order);
        assert_eq!(p.index, 7);
        assert_eq!(p.answered_count(), QUESTION_COUNT - 1);
        assert_eq!(p.last_active_at, Some(t0()));
    }

    #[test]
    fn resume_complete_answers_sits_on_last_question() {
        let p = TestProgress::resume(
            None,
            Some(&json!(vec![4; QUESTION_COUNT])),
            Some(t0()),
            t0(),
            ttl(),
            "fresh",
            2,
        );
        assert_eq!(p.index, QUESTION_COUNT - 1);
        assert_eq!(p.question_order, make_question_order("fresh", 2));
    }

    #[test]
    fn resume_expired_starts_over() {
        let order = make_question_order("original", 2);
        let p = TestProgress::resume(
            Some(&json!(order)),
            Some(&json!(vec![3; QUESTION_COUNT])),
            Some(t0()),
            t0() + Duration::hours(2),
            ttl(),
            "fresh",
            2,
        );
        assert_eq!(p.question_order, make_question_order("fresh", 2));
        assert_eq!(p.answered_count(), 0);
    }

    #[test]
    fn resume_replaces_short_order() {
        let p = TestProgress::resume(
            Some(&json!(["E1", "E2"])),
            None,
            None,
            t0(),
            ttl(),
            "fresh",
            2,
        );
        assert_eq!(p.question_order, make_question_order("fresh", 2));
    }

    #[test]
    fn resume_replaces_order_with_bad_ids() {
        let mut unknown = make_question_order("original", 2);
        unknown[0] = "X1".to_string();
        let mut repeated = make_question_order("original", 2);
        repeated[1] = repeated[0].clone();

        for order in [unknown, repeated] {
            assert_eq!(order.len(), QUESTION_COUNT);
            let p = TestProgress::resume(
                Some(&json!(order)),
                Some(&json!(vec![2; QUESTION_COUNT])),
                Some(t0()),
                t0(),
                ttl(),
                "fresh",
                2,
            );
            assert_eq!(p.question_order, make_question_order("fresh", 2));
            assert!(is_valid_order(&p.question_order));
            assert_eq!(p.answered_count(), QUESTION_COUNT);
        }
    }

    #[test]
    fn finish_requires_every_answer() {
        let mut p = TestProgress::start("seed", 2, t0());
        p.answers[0] = 5;
        let err = p.finish(&Scorer::new(), t0()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::IncompleteAnswers {
                answered: 1,
                total: 25
            })
        ));
    }

    #[test]
    fn finish_scores_under_session_order() {
        let mut p = TestProgress::start("seed", 2, t0());
        p.answers = vec![5; QUESTION_COUNT];
        let result = p.finish(&Scorer::new(), t0()).unwrap();
        assert_eq!(result.question_order.as_ref(), Some(&p.question_order));
        assert_eq!(result.scores.extraversion, 80.0);
        assert_eq!(result.created_at, t0());
    }

    #[test]
    fn seeds_are_unique() {
        assert_ne!(new_seed(), new_seed());
    }
}
