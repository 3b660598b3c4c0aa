//! Search entry points.
//!
//! `run_search` dispatches one configured search on a board. The
//! `SearchController` owns a validated config and a stop flag; it can run a
//! search on the calling thread (`find_path`) or on a worker thread
//! (`spawn`), in which case candidates arrive as `SearchEvent`s over a
//! channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::board::{Board, Snapshot};
use crate::config::{Algorithm, ConfigError, SolverConfig};
use crate::movegen::{Constraint, Constraints};

use super::{
    exhaustive_search, ida_star_search, race, uct_search, Candidate, Reporter, SearchResult, StopCheck,
};

/// Runs the single (non-race) algorithm `config` names.
pub(crate) fn run_single<R: Reporter>(
    board: &Board,
    config: &SolverConfig,
    constraints: &Constraints,
    check: &mut StopCheck<'_>,
    reporter: &mut R,
) -> SearchResult {
    match config.algorithm {
        Algorithm::Exhaustive | Algorithm::Race => {
            let mut chain = config.scoring_chain();
            exhaustive_search(
                board,
                constraints,
                &mut chain,
                config.max_depth,
                config.strategy,
                check,
                reporter,
            )
        }
        Algorithm::IdaStar => ida_star_search(board, constraints, &config.ida, check, reporter),
        Algorithm::Uct => uct_search(board, constraints, &config.uct, config.max_depth, check, reporter),
    }
}

/// Runs the search `config` describes until it finishes, `stop` is raised,
/// or `deadline` passes.
pub fn run_search<R: Reporter + Send>(
    board: &Board,
    config: &SolverConfig,
    constraints: &Constraints,
    stop: &AtomicBool,
    deadline: Option<Instant>,
    reporter: &mut R,
) -> SearchResult {
    match config.algorithm {
        Algorithm::Race => race(
            board,
            config,
            constraints,
            &Algorithm::RACE_MEMBERS,
            stop,
            deadline,
            reporter,
        ),
        _ => {
            let mut check = StopCheck::new(stop, deadline);
            run_single(board, config, constraints, &mut check, reporter)
        }
    }
}

/// Owns a validated configuration and the stop flag of the searches it runs.
///
/// A cancelled controller stays cancelled; use a new one per search.
pub struct SearchController {
    config: SolverConfig,
    constraints: Constraints,
    stop: Arc<AtomicBool>,
}

impl SearchController {
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let constraints = config.constraints();
        Ok(SearchController {
            config,
            constraints,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Adds a constraint on top of the ones the config describes.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Asks the running search to stop. It returns with the best candidate
    /// already reported.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Shared handle on the stop flag, for cancelling from another thread.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Searches `board` on the calling thread. `reporter` sees every
    /// improving candidate; the returned best is the last one it saw.
    pub fn find_path<R: Reporter + Send>(&self, board: &Snapshot, reporter: &mut R) -> SearchResult {
        let deadline = self.config.deadline(Instant::now());
        let working = board.to_board();
        run_search(
            &working,
            &self.config,
            &self.constraints,
            &self.stop,
            deadline,
            reporter,
        )
    }

    /// Searches `board` on a worker thread.
    pub fn spawn(self, board: Snapshot) -> SearchHandle {
        let (tx, events) = mpsc::channel();
        let stop = self.stop_flag();
        let worker = thread::spawn(move || {
            let mut reporter = ChannelReporter { tx };
            self.find_path(&board, &mut reporter)
        });
        SearchHandle { stop, events, worker }
    }
}

/// Output of a search running on a worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Candidate(Candidate),
    Progress(f64),
}

struct ChannelReporter {
    tx: Sender<SearchEvent>,
}

impl Reporter for ChannelReporter {
    fn candidate(&mut self, candidate: &Candidate, _board: &Board) {
        // The receiver may be gone; the search still runs to completion.
        let _ = self.tx.send(SearchEvent::Candidate(candidate.clone()));
    }

    fn progress(&mut self, fraction: f64) {
        let _ = self.tx.send(SearchEvent::Progress(fraction));
    }
}

pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    events: Receiver<SearchEvent>,
    worker: JoinHandle<SearchResult>,
}

impl SearchHandle {
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Events in the order the search produced them. Iteration ends once
    /// the search has finished and everything was received.
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the search to end.
    pub fn join(self) -> thread::Result<SearchResult> {
        self.worker.join()
    }
}
