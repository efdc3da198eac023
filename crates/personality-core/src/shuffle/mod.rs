//! Deterministic question ordering.
//!
//! An order is a permutation of the 25 question ids, generated once per
//! test session from an opaque seed and reused for both presentation and
//! scoring. The same seed and run limit always produce the same order.
//!
//! ## Construction
//!
//! 1. Hash the seed and drive a [`Mulberry32`] generator from it.
//! 2. Fisher-Yates shuffle the canonical bank into a bag.
//! 3. Greedily take from the bag, preferring the first question that does
//!    not extend a same-trait pair into a triple.
//! 4. If the greedy pass still leaves a run longer than the limit (it can
//!    strand same-trait questions at the tail), reshuffle with the same
//!    generator and try again.
//! 5. After [`MAX_GREEDY_ATTEMPTS`] failures, deal the questions out
//!    round-robin by trait, which never places two of a trait side by side.
//!
//! The first attempt consumes the generator exactly like the browser build,
//! so seeds that succeed first time produce identical orders on both sides.

pub mod rng;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::questions::{Question, Trait, QUESTIONS, QUESTION_COUNT};

pub use rng::{Mulberry32, SeedHasher};

/// Run limit used by the test flow.
pub const DEFAULT_MAX_SAME_TRAIT_IN_ROW: usize = 2;

/// Greedy passes tried before falling back to a round-robin deal.
pub const MAX_GREEDY_ATTEMPTS: usize = 4;

/// Produce the question order for `seed`.
///
/// `max_same_trait_in_row` of 0 disables the run check.
pub fn make_question_order(seed: &str, max_same_trait_in_row: usize) -> Vec<String> {
    let mut rng = Mulberry32::from_seed_str(seed);

    for attempt in 0..MAX_GREEDY_ATTEMPTS {
        let out = greedy_order(&mut rng);
        if !violates_max_run(&out, max_same_trait_in_row) {
            return ids_of(&out);
        }
        debug!(attempt, max_same_trait_in_row, "greedy order exceeded run limit");
    }

    warn!(
        max_same_trait_in_row,
        "no greedy order within run limit, dealing round-robin by trait"
    );
    ids_of(&round_robin_order(&mut rng))
}

fn ids_of(order: &[&Question]) -> Vec<String> {
    order.iter().map(|q| q.id.to_string()).collect()
}

/// One shuffle-then-pick pass over the whole bank.
fn greedy_order(rng: &mut Mulberry32) -> Vec<&'static Question> {
    let mut bag: Vec<&'static Question> = QUESTIONS.iter().collect();
    rng.shuffle(&mut bag);

    let mut out: Vec<&'static Question> = Vec::with_capacity(QUESTION_COUNT);
    while !bag.is_empty() {
        let pick = pick_next(&bag, &out).unwrap_or(0);
        out.push(bag.remove(pick));
    }
    out
}

/// Shuffle, group by trait in order of first appearance, then take one
/// question per trait per round.
fn round_robin_order(rng: &mut Mulberry32) -> Vec<&'static Question> {
    let mut shuffled: Vec<&'static Question> = QUESTIONS.iter().collect();
    rng.shuffle(&mut shuffled);

    let mut groups: Vec<(Trait, Vec<&'static Question>)> = Vec::with_capacity(Trait::ALL.len());
    for q in shuffled {
        match groups.iter_mut().find(|(t, _)| *t == q.trait_code) {
            Some((_, group)) => group.push(q),
            None => groups.push((q.trait_code, vec![q])),
        }
    }

    let rounds = groups.iter().map(|(_, g)| g.len()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(QUESTION_COUNT);
    for round in 0..rounds {
        for (_, group) in &groups {
            if let Some(q) = group.get(round) {
                out.push(*q);
            }
        }
    }
    out
}

/// First bag index that may follow `placed` without forming a triple.
fn pick_next(bag: &[&Question], placed: &[&Question]) -> Option<usize> {
    let last = placed.last().map(|q| q.trait_code);
    let before_last = placed.len().checked_sub(2).map(|i| placed[i].trait_code);

    bag.iter().position(|q| match last {
        None => true,
        Some(t) if t != q.trait_code => true,
        Some(_) => before_last != Some(q.trait_code),
    })
}

/// Whether any run of one trait is longer than `max_same_trait_in_row`.
pub fn violates_max_run(order: &[&Question], max_same_trait_in_row: usize) -> bool {
    if max_same_trait_in_row == 0 {
        return false;
    }
    longest_trait_run(order.iter().map(|q| q.trait_code)) > max_same_trait_in_row
}

/// Length of the longest run of identical consecutive traits.
pub fn longest_trait_run(traits: impl IntoIterator<Item = Trait>) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<Trait> = None;
    for t in traits {
        run = if prev == Some(t) { run + 1 } else { 1 };
        longest = longest.max(run);
        prev = Some(t);
    }
    longest
}

/// Resolve a stored order into questions.
///
/// Anything other than a permutation of the bank ids (absent, wrong length,
/// an unknown id, a repeated id) resolves to canonical order. Regenerating
/// a broken order is the caller's job.
pub fn questions_from_order<S: AsRef<str>>(order: Option<&[S]>) -> Vec<Question> {
    let canonical = || QUESTIONS.to_vec();

    let Some(order) = order else {
        return canonical();
    };
    if order.len() != QUESTION_COUNT {
        if !order.is_empty() {
            debug!(len = order.len(), "stored order has wrong length, using canonical");
        }
        return canonical();
    }

    let mut seen = HashSet::with_capacity(QUESTION_COUNT);
    let mut mapped = Vec::with_capacity(QUESTION_COUNT);
    for id in order {
        let id = id.as_ref();
        let Some(q) = crate::questions::question_by_id(id) else {
            debug!(id, "stored order has unknown id, using canonical");
            return canonical();
        };
        if !seen.insert(q.id) {
            debug!(id, "stored order repeats an id, using canonical");
            return canonical();
        }
        mapped.push(*q);
    }
    mapped
}

/// Whether `order` is a permutation of the bank ids.
pub fn is_valid_order<S: AsRef<str>>(order: &[S]) -> bool {
    order.len() == QUESTION_COUNT
        && questions_from_order(Some(order))
            .iter()
            .zip(order)
            .all(|(q, id)| q.id == id.as_ref())
}
