//! Path search.
//!
//! Three independent strategies explore drag paths on a single working
//! board: exhaustive depth-limited backtracking, IDA*, and UCT. All are
//! single-threaded and cooperative: they poll a shared stop flag (and an
//! optional deadline) once per node and unwind with the best candidate
//! already reported. `race` runs several of them side by side, each on its
//! own board clone, and `controller` ties configuration to the strategies.

pub mod controller;
pub mod exhaustive;
pub mod ida_star;
pub mod race;
pub mod strategy;
pub mod uct;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::{Board, Path};

pub use controller::{run_search, SearchController, SearchEvent, SearchHandle};
pub use exhaustive::exhaustive_search;
pub use ida_star::{ida_star_search, IdaConfig, MoveCost, PureColorPolicy};
pub use race::race;
pub use strategy::SearchStrategy;
pub use uct::{uct_search, UctConfig};

/// An improving path found during search.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub path: Path,
    /// Milestone text describing why this path is good.
    pub text: String,
    /// Combos produced by the path, all cascades included.
    pub combos: u32,
    /// Strategy-specific quality in `[0, 1]`.
    pub quality: f64,
}

/// Result of a search: the best candidate (if any) and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best: Option<Candidate>,
    pub nodes: u64,
    pub elapsed: Duration,
    /// True when the search stopped because of the stop flag or deadline.
    pub cancelled: bool,
}

impl SearchResult {
    pub fn empty() -> Self {
        SearchResult {
            best: None,
            nodes: 0,
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }
}

/// Receives search output as it happens.
///
/// `board` is the working board with the candidate's path applied, before
/// any cascade.
pub trait Reporter {
    fn candidate(&mut self, candidate: &Candidate, board: &Board);

    fn progress(&mut self, _fraction: f64) {}
}

impl<F: FnMut(&Candidate)> Reporter for F {
    fn candidate(&mut self, candidate: &Candidate, _board: &Board) {
        self(candidate)
    }
}

/// Reporter that ignores everything.
pub struct Silent;

impl Reporter for Silent {
    fn candidate(&mut self, _candidate: &Candidate, _board: &Board) {}
}

/// How often (in checks) the deadline is compared against the clock.
const DEADLINE_CHECK_INTERVAL: u32 = 64;

/// Cooperative cancellation: a shared flag plus an optional deadline.
///
/// The flags are read on every check; the clock only every
/// `DEADLINE_CHECK_INTERVAL` checks. Once tripped it stays tripped.
pub struct StopCheck<'a> {
    stop: &'a AtomicBool,
    linked: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
    ticks: u32,
    tripped: bool,
}

impl<'a> StopCheck<'a> {
    pub fn new(stop: &'a AtomicBool, deadline: Option<Instant>) -> Self {
        StopCheck {
            stop,
            linked: None,
            deadline,
            ticks: 0,
            tripped: false,
        }
    }

    /// Stops when either flag is raised.
    pub fn linked(stop: &'a AtomicBool, linked: &'a AtomicBool, deadline: Option<Instant>) -> Self {
        StopCheck {
            linked: Some(linked),
            ..StopCheck::new(stop, deadline)
        }
    }

    pub fn should_stop(&mut self) -> bool {
        if self.tripped {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) || self.linked.is_some_and(|l| l.load(Ordering::Relaxed)) {
            self.tripped = true;
            return true;
        }
        if let Some(deadline) = self.deadline {
            self.ticks += 1;
            if self.ticks >= DEADLINE_CHECK_INTERVAL {
                self.ticks = 0;
                if Instant::now() >= deadline {
                    self.tripped = true;
                }
            }
        }
        self.tripped
    }

    pub fn tripped(&self) -> bool {
        self.tripped
    }
}
