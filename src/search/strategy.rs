//! Branch-continuation strategies for the exhaustive search.

use serde::{Deserialize, Serialize};

/// Decides whether the exhaustive search keeps extending a path.
///
/// Every strategy sees the quality history of the current branch and the
/// search-wide record: index 0 is the untouched board, index `d` the board
/// after `d` moves. The hard depth cap is applied separately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Expand every branch up to the depth cap.
    Exhaustive,
    /// Drop a branch once none of its last `window` moves beat the best
    /// quality seen anywhere in the search `window` moves shallower.
    Improving { window: usize },
    /// Allow `min_depth` moves plus up to `extra_depth` more in proportion
    /// to the current quality.
    LinearCap { min_depth: usize, extra_depth: usize },
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::Exhaustive
    }
}

impl SearchStrategy {
    /// Whether the branch whose qualities are `history` should grow by one
    /// more move. `record[d]` is the best quality seen at depth `d` by any
    /// branch so far, this one included. `history` is never empty and
    /// `record` is at least as long.
    pub fn should_continue(&self, history: &[f64], record: &[f64]) -> bool {
        let depth = history.len() - 1;
        match *self {
            SearchStrategy::Exhaustive => true,
            SearchStrategy::Improving { window } => {
                if window == 0 || depth < window {
                    return true;
                }
                let baseline = record[depth - window].max(history[depth - window]);
                history[depth - window + 1..].iter().any(|&q| q > baseline)
            }
            SearchStrategy::LinearCap {
                min_depth,
                extra_depth,
            } => {
                let quality = history[depth];
                let cap = min_depth + (quality * extra_depth as f64).round() as usize;
                depth < cap
            }
        }
    }
}
