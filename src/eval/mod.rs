//! Quality estimation.
//!
//! Pure functions over a board or a resolved combo list: the combo ceiling
//! used as a search bound and normaliser, and derived metrics such as group
//! attacks and per-colour usage.

pub mod heuristic;

pub use heuristic::{
    color_combo_ceiling, color_variety, group_attack_count, max_achievable_combo,
    stacked_combo_count, type_usage, usage_by_type, GROUP_ATTACK_SIZE,
};
