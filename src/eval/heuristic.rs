//! Board and combo heuristics.
//!
//! `max_achievable_combo` estimates how many combos a board can produce at
//! best. It is the normalisation divisor for quality scores and the default
//! target for IDA*. The per-colour ceiling is `n / 3` up to 20 tiles; past
//! that, adjacency leaves less room to split a colour into separate groups,
//! and at more than 30 tiles no split is assumed possible.

use crate::board::{Board, TileType, TypeSet, ALL_COLORS, COLOR_COUNT};
use crate::resolve::Combo;

/// Combo ceiling for 21..=30 tiles of one colour.
const LARGE_COUNT_CEILING: [u32; 10] = [5, 5, 4, 3, 3, 2, 1, 1, 1, 1];

/// Minimum combo size that counts as a group attack.
pub const GROUP_ATTACK_SIZE: u32 = 5;

/// Upper bound on combos for `count` tiles of a single colour.
pub fn color_combo_ceiling(count: u32) -> u32 {
    match count {
        0..=20 => count / 3,
        21..=30 => LARGE_COUNT_CEILING[(count - 21) as usize],
        _ => 0,
    }
}

/// Upper bound on the combos `board` can produce.
pub fn max_achievable_combo(board: &Board) -> u32 {
    board
        .color_counts()
        .iter()
        .map(|&n| color_combo_ceiling(n))
        .sum()
}

/// Number of distinct colours in `types` with at least one combo of five or
/// more tiles.
pub fn group_attack_count(combos: &[Combo], types: TypeSet) -> u32 {
    let mut seen = TypeSet::EMPTY;
    for combo in combos {
        if types.contains(combo.kind) && combo.size() >= GROUP_ATTACK_SIZE {
            seen = seen.with(combo.kind);
        }
    }
    seen.len()
}

/// Tiles of `kind` removed across all combos.
pub fn type_usage(combos: &[Combo], kind: TileType) -> u32 {
    combos
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.size())
        .sum()
}

/// Tiles removed per colour, indexed by `TileType as usize`.
pub fn usage_by_type(combos: &[Combo]) -> [u32; COLOR_COUNT] {
    let mut usage = [0u32; COLOR_COUNT];
    for combo in combos {
        if combo.kind.is_color() {
            usage[combo.kind as usize] += combo.size();
        }
    }
    usage
}

/// Combos formed after the first batch (skyfall / stacked combos).
pub fn stacked_combo_count(combos: &[Combo]) -> u32 {
    combos.iter().filter(|c| c.batch > 0).count() as u32
}

/// Number of colours present on the board.
pub fn color_variety(board: &Board) -> u32 {
    let counts = board.color_counts();
    ALL_COLORS
        .iter()
        .filter(|&&k| counts[k as usize] > 0)
        .count() as u32
}
