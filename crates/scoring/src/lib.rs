//! Scoring & Decision Engine (C4).
//!
//! Pure aggregation over the alert list a rule evaluation pass produced:
//! clamp to a total score, derive severity and fraud probability, and reduce
//! the score plus the two amount-sensitive alert kinds to a final
//! [`vigil_core::Decision`]. No I/O, no state — see `engine::score_and_decide`.

pub mod engine;

pub use engine::{score_and_decide, ScoringOutcome};
