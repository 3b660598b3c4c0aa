//! Exhaustive depth-limited backtracking.
//!
//! For every legal start cell the search tries every legal move, evaluates
//! the resulting board with a full cascade on a scratch copy, and recurses
//! while the depth cap and the `SearchStrategy` allow it. The working board
//! is mutated in place under `SwapGuard`s, so it is back to its initial
//! arrangement whenever a branch returns, cancelled or not.

use std::time::Instant;

use crate::board::{Board, Cell, Direction, Path, SwapGuard};
use crate::movegen::Constraints;
use crate::resolve::Resolver;
use crate::scoring::{ScoringChain, Submission, Verdict};

use super::{Candidate, Reporter, SearchResult, SearchStrategy, StopCheck};

/// Minimum progress step between two progress reports.
const PROGRESS_STEP: f64 = 0.01;

struct Exhaustive<'a, 'b, R> {
    constraints: &'a Constraints,
    chain: &'a mut ScoringChain,
    max_depth: usize,
    strategy: SearchStrategy,
    check: &'a mut StopCheck<'b>,
    reporter: &'a mut R,
    resolver: Resolver,
    scratch: Board,
    history: Vec<f64>,
    /// Best quality seen at each depth across all branches.
    record: Vec<f64>,
    best: Option<Candidate>,
    nodes: u64,
    done: f64,
    reported: f64,
}

impl<R: Reporter> Exhaustive<'_, '_, R> {
    /// Resolves `board` on the scratch copy, submits it to the chain, and
    /// reports it if it beats the best so far. Returns its quality.
    fn evaluate(&mut self, board: &Board, start: Cell, path: &[Direction]) -> f64 {
        self.nodes += 1;
        self.scratch.clone_from(board);
        let combos = self.resolver.resolve_in_place(&mut self.scratch);
        self.chain.submit(&Submission {
            board: &self.scratch,
            start,
            path,
            combos,
        });
        let combo_count = combos.len() as u32;
        let quality = self.chain.quality_estimate();

        if !path.is_empty() && self.chain.compare_to_best() == Verdict::Better {
            self.chain.accept_as_best();
            let candidate = Candidate {
                path: Path::with_moves(start, path.to_vec()),
                text: self.chain.milestone_text(),
                combos: combo_count,
                quality,
            };
            self.reporter.candidate(&candidate, board);
            self.best = Some(candidate);
        }
        quality
    }

    /// Explores every continuation of `path`, whose held tile sits at
    /// `from`. `weight` is this subtree's share of the total work.
    fn explore(&mut self, board: &mut Board, start: Cell, path: &mut Vec<Direction>, from: Cell, weight: f64) {
        let remaining = self.max_depth - path.len() - 1;
        let moves = self.constraints.legal_moves(board, start, &path[..], from, remaining);
        if moves.is_empty() {
            self.advance(weight);
            return;
        }
        let share = weight / moves.len() as f64;

        for &(dir, target) in moves.as_slice() {
            if self.check.should_stop() {
                return;
            }
            let mut guard = SwapGuard::new(board, from, target);
            path.push(dir);
            let quality = self.evaluate(&guard, start, &path[..]);
            self.history.push(quality);
            let depth = path.len();
            self.record[depth] = self.record[depth].max(quality);

            let deeper = depth < self.max_depth && self.strategy.should_continue(&self.history, &self.record);
            if deeper {
                self.explore(&mut guard, start, path, target, share);
            } else {
                self.advance(share);
            }

            self.history.pop();
            path.pop();
        }
    }

    fn advance(&mut self, weight: f64) {
        self.done += weight;
        if self.done - self.reported >= PROGRESS_STEP {
            self.reported = self.done;
            self.reporter.progress(self.done.min(1.0));
        }
    }
}

/// Runs the exhaustive search on `board` up to `max_depth` moves.
///
/// Every candidate the chain judges strictly better than the previous best
/// is passed to `reporter` as soon as it is found; the last one reported is
/// the returned best.
pub fn exhaustive_search<R: Reporter>(
    board: &Board,
    constraints: &Constraints,
    chain: &mut ScoringChain,
    max_depth: usize,
    strategy: SearchStrategy,
    check: &mut StopCheck<'_>,
    reporter: &mut R,
) -> SearchResult {
    let started = Instant::now();
    chain.reset(board);

    let mut search = Exhaustive {
        constraints,
        chain,
        max_depth,
        strategy,
        check,
        reporter,
        resolver: Resolver::new(),
        scratch: board.clone(),
        history: Vec::with_capacity(max_depth + 1),
        record: vec![f64::NEG_INFINITY; max_depth + 1],
        best: None,
        nodes: 0,
        done: 0.0,
        reported: 0.0,
    };

    if max_depth > 0 {
        let root_quality = search.evaluate(board, Cell::new(0, 0), &[]);
        search.record[0] = root_quality;
        let starts: Vec<Cell> = board
            .coords()
            .filter(|&cell| constraints.can_start(cell, board))
            .collect();
        let mut work = board.clone();
        let mut path = Vec::with_capacity(max_depth);
        let share = 1.0 / starts.len().max(1) as f64;

        for start in starts {
            if search.check.should_stop() {
                break;
            }
            search.history.clear();
            search.history.push(root_quality);
            search.explore(&mut work, start, &mut path, start, share);
        }
        debug_assert_eq!(&work, board);
    }

    let cancelled = search.check.tripped();
    if !cancelled {
        search.reporter.progress(1.0);
    }
    SearchResult {
        best: search.best,
        nodes: search.nodes,
        elapsed: started.elapsed(),
        cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{replay, standard_constraints};
    use crate::protocol::notation::parse_board;
    use crate::resolve::resolve;
    use crate::search::Silent;
    use std::sync::atomic::{AtomicBool, Ordering};

    // One swap at the top right lines up three reds.
    const ONE_SWAP: &str = "RRBR/GLDH/LDHG";

    fn run(board: &Board, depth: usize, strategy: SearchStrategy) -> (SearchResult, Vec<Candidate>) {
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut seen = Vec::new();
        let mut reporter = |c: &Candidate| seen.push(c.clone());
        let result = exhaustive_search(
            board,
            &Constraints::new(),
            &mut chain,
            depth,
            strategy,
            &mut check,
            &mut reporter,
        );
        (result, seen)
    }

    #[test]
    fn finds_single_swap_combo() {
        let board = parse_board(ONE_SWAP).unwrap();
        let (result, _) = run(&board, 1, SearchStrategy::Exhaustive);
        let best = result.best.unwrap();
        assert_eq!(best.path.len(), 1);
        assert!(best.combos >= 1);
        assert!(!result.cancelled);

        let after = replay(&board, &best.path, &Constraints::new()).unwrap();
        assert_eq!(resolve(&after).combo_count() as u32, best.combos);
    }

    #[test]
    fn reports_strictly_improve() {
        let board = parse_board("RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL").unwrap();
        let (result, seen) = run(&board, 3, SearchStrategy::Exhaustive);
        assert!(!seen.is_empty());
        for pair in seen.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                b.combos > a.combos || (b.combos == a.combos && b.path.len() < a.path.len()),
                "{:?} then {:?}",
                a,
                b
            );
        }
        assert_eq!(result.best.as_ref(), seen.last());
    }

    #[test]
    fn zero_depth_finds_nothing() {
        let board = parse_board(ONE_SWAP).unwrap();
        let (result, seen) = run(&board, 0, SearchStrategy::Exhaustive);
        assert!(result.best.is_none());
        assert!(seen.is_empty());
    }

    #[test]
    fn cancel_after_first_candidate_returns_it() {
        let board = parse_board("RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL").unwrap();
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut first = None;
        let mut reporter = |c: &Candidate| {
            if first.is_none() {
                first = Some(c.clone());
            }
            stop.store(true, Ordering::Relaxed);
        };
        let result = exhaustive_search(
            &board,
            &Constraints::new(),
            &mut chain,
            4,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut reporter,
        );
        assert!(result.cancelled);
        assert_eq!(result.best, first);
    }

    #[test]
    fn pruning_strategies_visit_fewer_nodes() {
        let board = parse_board("RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL").unwrap();
        let (full, _) = run(&board, 3, SearchStrategy::Exhaustive);
        let (improving, _) = run(&board, 3, SearchStrategy::Improving { window: 1 });
        let (capped, _) = run(
            &board,
            3,
            SearchStrategy::LinearCap {
                min_depth: 1,
                extra_depth: 0,
            },
        );
        assert!(improving.nodes <= full.nodes);
        assert!(capped.nodes < full.nodes);
    }

    #[test]
    fn respects_constraints() {
        let board = parse_board(ONE_SWAP).unwrap();
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let constraints = standard_constraints(false, true, true);
        let mut seen = Vec::new();
        let mut reporter = |c: &Candidate| seen.push(c.clone());
        exhaustive_search(
            &board,
            &constraints,
            &mut chain,
            3,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut reporter,
        );
        for c in &seen {
            assert_eq!(c.path.diagonal_count(), 0);
            assert!(replay(&board, &c.path, &constraints).is_ok());
        }
    }

    #[derive(Default)]
    struct Recorder {
        candidates: usize,
        progress: Vec<f64>,
    }

    impl Reporter for Recorder {
        fn candidate(&mut self, _candidate: &Candidate, _board: &Board) {
            self.candidates += 1;
        }

        fn progress(&mut self, fraction: f64) {
            self.progress.push(fraction);
        }
    }

    #[test]
    fn progress_rises_to_one() {
        let board = parse_board("RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL").unwrap();
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut recorder = Recorder::default();
        let result = exhaustive_search(
            &board,
            &Constraints::new(),
            &mut chain,
            3,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut recorder,
        );
        assert!(!result.cancelled);
        assert!(recorder.candidates > 0);
        assert!(recorder.progress.len() > 2, "{:?}", recorder.progress);
        assert!(recorder.progress.iter().all(|&f| (0.0..=1.0).contains(&f)));
        for pair in recorder.progress.windows(2) {
            assert!(pair[1] >= pair[0], "{:?}", recorder.progress);
        }
        assert_eq!(recorder.progress.last(), Some(&1.0));
    }

    #[test]
    fn cancelled_search_never_claims_completion() {
        let board = parse_board("RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL").unwrap();
        let stop = AtomicBool::new(true);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let mut recorder = Recorder::default();
        let result = exhaustive_search(
            &board,
            &Constraints::new(),
            &mut chain,
            3,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut recorder,
        );
        assert!(result.cancelled);
        assert!(recorder.progress.iter().all(|&f| f < 1.0));
    }

    #[test]
    fn silent_reporter_still_returns_best() {
        let board = parse_board(ONE_SWAP).unwrap();
        let stop = AtomicBool::new(false);
        let mut check = StopCheck::new(&stop, None);
        let mut chain = ScoringChain::combos_then_steps();
        let result = exhaustive_search(
            &board,
            &Constraints::new(),
            &mut chain,
            1,
            SearchStrategy::Exhaustive,
            &mut check,
            &mut Silent,
        );
        assert!(result.best.is_some());
        assert!(result.nodes > 1);
    }
}
