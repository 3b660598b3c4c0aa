//! Monte-Carlo tree search with UCB1 selection.
//!
//! The tree lives in an arena. Children of the root are start cells;
//! children of every other node are the legal moves of the held tile. Each
//! iteration descends from the root, always taking an unvisited child when
//! one exists and otherwise the child with the highest UCB1 score, stops at
//! the first unvisited node, evaluates the board there, and adds the value
//! to every node on the way back up. A node is expanded the first time the
//! descent passes through it after its own evaluation.
//!
//! There is no natural end: the search runs until the iteration budget, the
//! stop flag, the deadline, or the node cap.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Direction, Path, SwapTrail};
use crate::eval::max_achievable_combo;
use crate::movegen::Constraints;
use crate::resolve::Resolver;

use super::{Candidate, Reporter, SearchResult, StopCheck};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UctConfig {
    /// Value of one combo; each step costs one point.
    pub points_per_combo: u32,
    /// Iteration budget. None runs until stopped.
    pub iterations: Option<u64>,
    /// Arena size at which the search stops growing the tree and returns.
    pub max_nodes: usize,
    /// Weight `c` in `sqrt(c * ln N / n)`.
    pub exploration: f64,
}

impl Default for UctConfig {
    fn default() -> Self {
        UctConfig {
            points_per_combo: 10,
            iterations: None,
            max_nodes: 2_000_000,
            exploration: 2.0,
        }
    }
}

struct Node {
    /// Start cell for children of the root, destination cell otherwise.
    cell: Cell,
    dir: Option<Direction>,
    children: Vec<u32>,
    expanded: bool,
    visits: u32,
    total: f64,
}

impl Node {
    fn new(cell: Cell, dir: Option<Direction>) -> Self {
        Node {
            cell,
            dir,
            children: Vec::new(),
            expanded: false,
            visits: 0,
            total: 0.0,
        }
    }
}

/// Picks the child to descend into: the first unvisited one, else the one
/// with the highest UCB1 score.
fn select(nodes: &[Node], parent: usize, exploration: f64, max_value: f64) -> Option<usize> {
    let children = &nodes[parent].children;
    if let Some(&fresh) = children.iter().find(|&&c| nodes[c as usize].visits == 0) {
        return Some(fresh as usize);
    }
    let ln_n = (nodes[parent].visits.max(1) as f64).ln();
    children
        .iter()
        .map(|&c| {
            let n = &nodes[c as usize];
            let visits = n.visits as f64;
            let score = n.total / visits / max_value + (exploration * ln_n / visits).sqrt();
            (c as usize, score)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Runs UCT on `board` with paths of at most `max_depth` moves.
///
/// A leaf is worth `max(0, combos * points_per_combo - steps)`. A candidate
/// is reported whenever a leaf's value exceeds every earlier one.
pub fn uct_search<R: Reporter>(
    board: &Board,
    constraints: &Constraints,
    config: &UctConfig,
    max_depth: usize,
    check: &mut StopCheck<'_>,
    reporter: &mut R,
) -> SearchResult {
    let started = Instant::now();
    let ppc = config.points_per_combo as i64;
    let max_value = (max_achievable_combo(board) as f64 * ppc as f64).max(1.0);

    let mut nodes = vec![Node::new(Cell::new(0, 0), None)];
    let mut resolver = Resolver::new();
    let mut scratch = board.clone();
    let mut work = board.clone();
    let mut path: Vec<Direction> = Vec::with_capacity(max_depth);
    let mut chain: Vec<usize> = Vec::with_capacity(max_depth + 2);

    let mut best: Option<Candidate> = None;
    let mut best_value = -1i64;
    let mut iterations = 0u64;
    let mut full = false;
    let progress_every = config.iterations.map(|n| (n / 100).max(1));

    while !full {
        if config.iterations.is_some_and(|limit| iterations >= limit) || check.should_stop() {
            break;
        }
        iterations += 1;
        path.clear();
        chain.clear();
        chain.push(0);

        let mut trail = SwapTrail::new(&mut work);
        let mut node = 0usize;
        let mut start: Option<Cell> = None;
        let mut held = Cell::new(0, 0);

        loop {
            if !nodes[node].expanded {
                let fresh: Vec<Node> = match start {
                    None => board
                        .coords()
                        .filter(|&cell| constraints.can_start(cell, board))
                        .map(|cell| Node::new(cell, None))
                        .collect(),
                    Some(_) if path.len() >= max_depth => Vec::new(),
                    Some(s) => constraints
                        .legal_moves(trail.board(), s, &path, held, max_depth - path.len() - 1)
                        .as_slice()
                        .iter()
                        .map(|&(dir, cell)| Node::new(cell, Some(dir)))
                        .collect(),
                };
                if nodes.len() + fresh.len() > config.max_nodes {
                    full = true;
                } else {
                    let first = nodes.len() as u32;
                    let count = fresh.len() as u32;
                    nodes.extend(fresh);
                    nodes[node].children = (first..first + count).collect();
                    nodes[node].expanded = true;
                }
            }

            let Some(child) = select(&nodes, node, config.exploration, max_value) else {
                break;
            };
            match nodes[child].dir {
                None => start = Some(nodes[child].cell),
                Some(dir) => {
                    trail.push(held, nodes[child].cell);
                    path.push(dir);
                }
            }
            held = nodes[child].cell;
            node = child;
            chain.push(child);
            if nodes[child].visits == 0 {
                break;
            }
        }

        let Some(start) = start else {
            // Nothing can be picked up.
            break;
        };

        scratch.clone_from(trail.board());
        let combos = resolver.resolve_in_place(&mut scratch).len() as u32;
        let value = (combos as i64 * ppc - path.len() as i64).max(0);

        if !path.is_empty() && value > best_value {
            best_value = value;
            let candidate = Candidate {
                path: Path::with_moves(start, path.clone()),
                text: format!("{} combos, {} steps, value {}", combos, path.len(), value),
                combos,
                quality: (value as f64 / max_value).min(1.0),
            };
            reporter.candidate(&candidate, trail.board());
            best = Some(candidate);
        }
        drop(trail);

        for &i in &chain {
            nodes[i].visits += 1;
            nodes[i].total += value as f64;
        }

        if let (Some(every), Some(limit)) = (progress_every, config.iterations) {
            if iterations % every == 0 {
                reporter.progress(iterations as f64 / limit as f64);
            }
        }
    }
    debug_assert_eq!(&work, board);

    SearchResult {
        best,
        nodes: iterations,
        elapsed: started.elapsed(),
        cancelled: check.tripped(),
    }
}
