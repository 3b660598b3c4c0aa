//! Runs several search strategies side by side.
//!
//! Each strategy works on its own clone of the board on a rayon worker. All
//! of them share the caller's stop flag plus a race-local one that is raised
//! as soon as any strategy finishes on its own, so an IDA* goal or a
//! completed exhaustive sweep ends the race. Candidates from every worker
//! pass through one mutex, are ranked by the configured scoring chain, and
//! are forwarded only when they beat everything forwarded so far. The last
//! forwarded candidate is the race result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;

use crate::board::Board;
use crate::config::{Algorithm, SolverConfig};
use crate::movegen::Constraints;
use crate::resolve::Resolver;
use crate::scoring::{ScoringChain, Submission, Verdict};

use super::controller::run_single;
use super::{Candidate, Reporter, SearchResult, StopCheck};

struct Shared<'r, R> {
    chain: ScoringChain,
    resolver: Resolver,
    scratch: Board,
    reporter: &'r mut R,
    best: Option<Candidate>,
}

struct RaceReporter<'s, 'r, R> {
    shared: &'s Mutex<Shared<'r, R>>,
}

impl<R: Reporter> Reporter for RaceReporter<'_, '_, R> {
    fn candidate(&mut self, candidate: &Candidate, board: &Board) {
        let mut guard = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        let shared = &mut *guard;
        shared.scratch.clone_from(board);
        let combos = shared.resolver.resolve_in_place(&mut shared.scratch);
        shared.chain.submit(&Submission {
            board: &shared.scratch,
            start: candidate.path.start,
            path: &candidate.path.moves,
            combos,
        });
        if shared.chain.compare_to_best() != Verdict::Better {
            return;
        }
        shared.chain.accept_as_best();
        let ranked = Candidate {
            text: shared.chain.milestone_text(),
            quality: shared.chain.quality_estimate(),
            ..candidate.clone()
        };
        shared.reporter.candidate(&ranked, board);
        shared.best = Some(ranked);
    }
}

/// Runs `algorithms` concurrently on `board`. `Algorithm::Race` entries are
/// ignored.
pub fn race<R: Reporter + Send>(
    board: &Board,
    config: &SolverConfig,
    constraints: &Constraints,
    algorithms: &[Algorithm],
    stop: &AtomicBool,
    deadline: Option<Instant>,
    reporter: &mut R,
) -> SearchResult {
    let started = Instant::now();
    let finished = AtomicBool::new(false);
    let mut chain = config.scoring_chain();
    chain.reset(board);
    let shared = Mutex::new(Shared {
        chain,
        resolver: Resolver::new(),
        scratch: board.clone(),
        reporter,
        best: None,
    });
    let algorithms: Vec<Algorithm> = algorithms
        .iter()
        .copied()
        .filter(|&a| a != Algorithm::Race)
        .collect();

    let work = || -> Vec<SearchResult> {
        algorithms
            .par_iter()
            .map(|&algorithm| {
                let mut own = config.clone();
                own.algorithm = algorithm;
                let mut check = StopCheck::linked(stop, &finished, deadline);
                let mut forward = RaceReporter { shared: &shared };
                let result = run_single(board, &own, constraints, &mut check, &mut forward);
                if !result.cancelled {
                    finished.store(true, Ordering::Relaxed);
                }
                result
            })
            .collect()
    };

    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(algorithms.len().max(1))
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            eprintln!("race: falling back to the global pool: {}", e);
            work()
        }
    };

    let shared = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    SearchResult {
        best: shared.best,
        nodes: results.iter().map(|r| r.nodes).sum(),
        elapsed: started.elapsed(),
        cancelled: stop.load(Ordering::Relaxed) || deadline.is_some_and(|d| Instant::now() >= d),
    }
}
