//! Solution scoring.
//!
//! A `ScoringChain` is an ordered list of `Criterion` values. Position in
//! the list is priority: earlier criteria decide, later ones only break ties.

pub mod chain;
pub mod criterion;

pub use chain::{ScoringChain, Submission, Verdict};
pub use criterion::Criterion;
