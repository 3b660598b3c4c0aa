//! Iterative-deepening A*.
//!
//! The cost of a path is the sum of its move costs; the heuristic is
//! `factor * (target - combos)` where `combos` is the full cascade count of
//! the board the path leaves behind. Each iteration runs a depth-first
//! search that prunes nodes whose `g + h` exceeds the current bound; the
//! next bound is the smallest `g + h` that was pruned. The first path with
//! `h == 0` ends the search.
//!
//! The heuristic is not admissible (one move can add several combos), so
//! the first goal found is not guaranteed to be the cheapest.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Direction, Path, SwapGuard};
use crate::eval::max_achievable_combo;
use crate::movegen::Constraints;
use crate::resolve::Resolver;

use super::{Candidate, Reporter, SearchResult, StopCheck};

/// Cost of one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveCost {
    pub orthogonal: u32,
    pub diagonal: u32,
}

impl Default for MoveCost {
    fn default() -> Self {
        MoveCost {
            orthogonal: 1,
            diagonal: 2,
        }
    }
}

impl MoveCost {
    pub fn uniform(cost: u32) -> Self {
        MoveCost {
            orthogonal: cost,
            diagonal: cost,
        }
    }

    #[inline]
    pub fn of(&self, dir: Direction) -> u32 {
        if dir.is_diagonal() {
            self.diagonal
        } else {
            self.orthogonal
        }
    }

    pub fn of_path(&self, moves: &[Direction]) -> u32 {
        moves.iter().fold(0, |total, &d| total.saturating_add(self.of(d)))
    }
}

/// What to do with a board made of a single colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PureColorPolicy {
    /// Return at once without a candidate: no rearrangement changes anything.
    #[default]
    Skip,
    /// Search it like any other board.
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdaConfig {
    /// Heuristic weight per missing combo.
    pub factor: u32,
    /// Combos to reach. None uses the board's combo ceiling.
    pub target_combo: Option<u32>,
    pub move_cost: MoveCost,
    /// The search gives up once the next bound on `g + h` exceeds this.
    pub max_cost: u32,
    pub pure_color: PureColorPolicy,
}

impl Default for IdaConfig {
    fn default() -> Self {
        IdaConfig {
            factor: 3,
            target_combo: None,
            move_cost: MoveCost::default(),
            max_cost: 40,
            pure_color: PureColorPolicy::Skip,
        }
    }
}

enum Step {
    Continue,
    Found,
    Cancelled,
}

struct IdaStar<'a, 'b, R> {
    constraints: &'a Constraints,
    config: &'a IdaConfig,
    target: u32,
    check: &'a mut StopCheck<'b>,
    reporter: &'a mut R,
    resolver: Resolver,
    scratch: Board,
    path: Vec<Direction>,
    bound: u32,
    next_bound: u32,
    best_key: (u32, u32),
    best: Option<Candidate>,
    nodes: u64,
}

impl<R: Reporter> IdaStar<'_, '_, R> {
    fn heuristic(&self, combos: u32) -> u32 {
        self.config.factor.saturating_mul(self.target.saturating_sub(combos))
    }

    /// Evaluates the board after the current path, reporting it when its
    /// `(h, g)` beats every earlier one. Returns `h`.
    fn evaluate(&mut self, board: &Board, start: Cell, g: u32) -> u32 {
        self.nodes += 1;
        self.scratch.clone_from(board);
        let combos = self.resolver.resolve_in_place(&mut self.scratch).len() as u32;
        let h = self.heuristic(combos);

        if (h, g) < self.best_key {
            self.best_key = (h, g);
            let candidate = Candidate {
                path: Path::with_moves(start, self.path.clone()),
                text: format!("{} combos, cost {}, {} steps", combos, g, self.path.len()),
                combos,
                quality: (combos as f64 / self.target.max(1) as f64).min(1.0),
            };
            self.reporter.candidate(&candidate, board);
            self.best = Some(candidate);
        }
        h
    }

    fn dfs(&mut self, board: &mut Board, start: Cell, from: Cell, g: u32) -> Step {
        let moves = self
            .constraints
            .legal_moves(board, start, &self.path, from, usize::MAX);

        for &(dir, target) in moves.as_slice() {
            if self.check.should_stop() {
                return Step::Cancelled;
            }
            let g = g.saturating_add(self.config.move_cost.of(dir));
            let mut guard = SwapGuard::new(board, from, target);
            self.path.push(dir);

            let h = self.evaluate(&guard, start, g);
            let step = if h == 0 {
                Step::Found
            } else if g.saturating_add(h) > self.bound {
                self.next_bound = self.next_bound.min(g.saturating_add(h));
                Step::Continue
            } else {
                self.dfs(&mut guard, start, target, g)
            };

            self.path.pop();
            match step {
                Step::Continue => {}
                done => return done,
            }
        }
        Step::Continue
    }
}

/// Runs IDA* on `board`. Candidates are reported whenever the pair
/// (heuristic, cost) strictly improves, heuristic first.
pub fn ida_star_search<R: Reporter>(
    board: &Board,
    constraints: &Constraints,
    config: &IdaConfig,
    check: &mut StopCheck<'_>,
    reporter: &mut R,
) -> SearchResult {
    let started = Instant::now();
    if config.pure_color == PureColorPolicy::Skip && board.pure_color().is_some() {
        return SearchResult::empty();
    }

    let target = config
        .target_combo
        .unwrap_or_else(|| max_achievable_combo(board));
    let mut search = IdaStar {
        constraints,
        config,
        target,
        check,
        reporter,
        resolver: Resolver::new(),
        scratch: board.clone(),
        path: Vec::new(),
        bound: 0,
        next_bound: u32::MAX,
        best_key: (u32::MAX, u32::MAX),
        best: None,
        nodes: 0,
    };

    let initial_combos = search.resolver.resolve(board).combo_count() as u32;
    search.bound = search.heuristic(initial_combos).min(config.max_cost);

    let starts: Vec<Cell> = board
        .coords()
        .filter(|&cell| constraints.can_start(cell, board))
        .collect();
    let mut work = board.clone();

    'deepen: loop {
        search.next_bound = u32::MAX;
        for &start in &starts {
            if search.check.should_stop() {
                break 'deepen;
            }
            match search.dfs(&mut work, start, start, 0) {
                Step::Continue => {}
                Step::Found | Step::Cancelled => break 'deepen,
            }
        }
        if search.next_bound == u32::MAX || search.next_bound > config.max_cost {
            break;
        }
        search.bound = search.next_bound;
        let fraction = search.bound as f64 / config.max_cost.max(1) as f64;
        search.reporter.progress(fraction.min(1.0));
    }
    debug_assert_eq!(&work, board);

    SearchResult {
        best: search.best,
        nodes: search.nodes,
        elapsed: started.elapsed(),
        cancelled: search.check.tripped(),
    }
}
