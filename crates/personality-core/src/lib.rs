//! # Personality Core Library
//!
//! Core logic for a 25-question Big Five personality test. The CLI binary
//! and the browser page run the same computation: a seeded question order,
//! per-trait scoring, and a 16-way profile code.
//!
//! ## Architecture
//!
//! - **Questions**: The fixed bank of 25 Likert items, five per trait
//! - **Shuffle**: A seeded generator and the order constraint (no long
//!   same-trait runs)
//! - **Scoring**: Trait percentages, the four derived axes, stability and
//!   profile code
//! - **Session**: Answer-by-answer progress with expiry
//! - **Config**: TOML-based settings
//!
//! ## Key Components
//!
//! - [`make_question_order`]: Deterministic order for a seed
//! - [`Scorer`]: Turns answers into a [`StoredResult`]
//! - [`TestProgress`]: State of a test being taken
//! - [`Config`]: Application configuration management

pub mod config;
pub mod display;
pub mod error;
pub mod questions;
pub mod result;
pub mod scoring;
pub mod session;
pub mod shuffle;

pub use config::Config;
pub use display::{display_rows, highest_row, DisplayKey, DisplayRow, Level, LevelThresholds};
pub use error::{ConfigError, CoreError, ValidationError};
pub use questions::{Question, Trait, QUESTIONS, QUESTION_COUNT};
pub use result::{StoredResult, RESULT_VERSION};
pub use scoring::{
    compute_result, AddOns, Axes, ProfileCode, ProfileRule, ScoreCard, Scorer, TraitScores,
};
pub use session::{Advance, TestProgress};
pub use shuffle::{make_question_order, questions_from_order, DEFAULT_MAX_SAME_TRAIT_IN_ROW};
