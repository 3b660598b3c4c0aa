//! Individual scoring criteria.
//!
//! Each criterion reduces a resolved candidate to one raw number and derives
//! from it an ordering key (larger is better), a quality in `[0, 1]`, and a
//! short milestone label.

use serde::{Deserialize, Serialize};

use crate::board::{TileType, TypeSet};
use crate::eval::{group_attack_count, stacked_combo_count, type_usage};

use super::chain::Submission;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    /// More combos is better.
    MaxCombo,
    /// Shorter paths are better.
    MinSteps,
    /// Group attacks over `types`. With `required > 0`, reaching `required`
    /// is all that matters; with 0, more is better.
    GroupAttack {
        #[serde(default = "attack_types")]
        types: TypeSet,
        #[serde(default)]
        required: u32,
    },
    /// Combo count as close to `count` as possible.
    ExactCombo { count: u32 },
    /// Tiles of `tile` used should lie in `[lower, upper]`; the penalty is
    /// the distance outside the range.
    TypeUsage {
        tile: TileType,
        lower: u32,
        upper: u32,
    },
    /// Fewer combos formed after the first batch is better.
    NoStacking,
    /// Random value; diversifies otherwise equal candidates.
    RandomTieBreak,
}

fn attack_types() -> TypeSet {
    TypeSet::ATTACK
}

impl Criterion {
    /// Raw measurement of a submission. `random` is a fresh draw used only
    /// by `RandomTieBreak`.
    pub(crate) fn measure(&self, sub: &Submission<'_>, random: u32) -> i64 {
        match self {
            Criterion::MaxCombo | Criterion::ExactCombo { .. } => sub.combos.len() as i64,
            Criterion::MinSteps => sub.path.len() as i64,
            Criterion::GroupAttack { types, .. } => group_attack_count(sub.combos, *types) as i64,
            Criterion::TypeUsage { tile, .. } => type_usage(sub.combos, *tile) as i64,
            Criterion::NoStacking => stacked_combo_count(sub.combos) as i64,
            Criterion::RandomTieBreak => random as i64,
        }
    }

    /// Ordering key; larger is better.
    pub(crate) fn key(&self, raw: i64) -> i64 {
        match self {
            Criterion::MaxCombo | Criterion::RandomTieBreak => raw,
            Criterion::MinSteps | Criterion::NoStacking => -raw,
            Criterion::GroupAttack { required, .. } => {
                if *required > 0 {
                    raw.min(*required as i64)
                } else {
                    raw
                }
            }
            Criterion::ExactCombo { count } => -(raw - *count as i64).abs(),
            Criterion::TypeUsage { lower, upper, .. } => -usage_penalty(raw, *lower, *upper),
        }
    }

    /// Quality in `[0, 1]`. `max_combo` is the board's combo ceiling.
    pub(crate) fn quality(&self, raw: i64, max_combo: u32) -> f64 {
        let q = match self {
            Criterion::MaxCombo => raw as f64 / max_combo.max(1) as f64,
            Criterion::MinSteps | Criterion::NoStacking => 1.0 / (1.0 + raw as f64),
            Criterion::GroupAttack { types, required } => {
                let denom = if *required > 0 { *required } else { types.len() };
                raw as f64 / denom.max(1) as f64
            }
            Criterion::ExactCombo { count } => {
                if *count == 0 {
                    if raw == 0 {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    1.0 - (raw - *count as i64).abs() as f64 / *count as f64
                }
            }
            Criterion::TypeUsage { lower, upper, .. } => {
                1.0 / (1.0 + usage_penalty(raw, *lower, *upper) as f64)
            }
            Criterion::RandomTieBreak => 0.5,
        };
        q.clamp(0.0, 1.0)
    }

    /// Fragment of the milestone text, or None for criteria that are not
    /// worth showing.
    pub(crate) fn label(&self, raw: i64) -> Option<String> {
        match self {
            Criterion::MaxCombo => Some(format!("{} combos", raw)),
            Criterion::MinSteps => Some(format!("{} steps", raw)),
            Criterion::GroupAttack { .. } => Some(format!("{} group attacks", raw)),
            Criterion::ExactCombo { count } => Some(format!("{}/{} combos", raw, count)),
            Criterion::TypeUsage { tile, .. } => Some(format!("{} {} used", raw, tile.name())),
            Criterion::NoStacking => Some(format!("{} stacked", raw)),
            Criterion::RandomTieBreak => None,
        }
    }
}

/// Distance of `raw` outside `[lower, upper]`.
fn usage_penalty(raw: i64, lower: u32, upper: u32) -> i64 {
    let (lower, upper) = (lower as i64, upper as i64);
    if raw < lower {
        lower - raw
    } else if raw > upper {
        raw - upper
    } else {
        0
    }
}
