//! Cascade resolution.
//!
//! Turns a board into the ordered list of combos it produces when every run
//! of three is removed, tiles fall, and the process repeats.

pub mod cascade;

pub use cascade::{resolve, Combo, Resolution, Resolver};
