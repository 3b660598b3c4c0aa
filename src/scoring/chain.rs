//! Ordered scoring chain.
//!
//! The chain compares the most recent submission against the best accepted
//! so far, criterion by criterion. The first criterion that tells the two
//! apart decides; only a tie moves on to the next one. An empty chain ties
//! everything (except that anything beats "no best yet").

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Cell, Direction};
use crate::eval::max_achievable_combo;
use crate::resolve::Combo;

use super::criterion::Criterion;

/// A resolved candidate handed to the chain.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    /// The board after the path and the full cascade.
    pub board: &'a Board,
    pub start: Cell,
    pub path: &'a [Direction],
    pub combos: &'a [Combo],
}

/// Outcome of comparing the current submission with the best so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Better,
    Worse,
    Tie,
}

pub struct ScoringChain {
    criteria: Vec<Criterion>,
    rng: SmallRng,
    max_combo: u32,
    current: Vec<i64>,
    best: Option<Vec<i64>>,
}

impl ScoringChain {
    /// Creates a chain. `seed == 0` seeds the tie-break RNG from entropy.
    pub fn new(criteria: Vec<Criterion>, seed: u64) -> Self {
        let rng = if seed != 0 {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_entropy()
        };
        let n = criteria.len();
        ScoringChain {
            criteria,
            rng,
            max_combo: 0,
            current: vec![0; n],
            best: None,
        }
    }

    /// The usual chain: most combos, then fewest steps.
    pub fn combos_then_steps() -> Self {
        ScoringChain::new(vec![Criterion::MaxCombo, Criterion::MinSteps], 1)
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Forgets the best candidate and recomputes the combo ceiling for a
    /// new initial board.
    pub fn reset(&mut self, initial: &Board) {
        self.max_combo = max_achievable_combo(initial);
        self.best = None;
        self.current.iter_mut().for_each(|v| *v = 0);
    }

    /// Combo ceiling of the board passed to `reset`.
    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Measures a new candidate; it becomes the "current" one.
    pub fn submit(&mut self, sub: &Submission<'_>) {
        for (slot, criterion) in self.current.iter_mut().zip(&self.criteria) {
            let random = match criterion {
                Criterion::RandomTieBreak => self.rng.gen::<u32>(),
                _ => 0,
            };
            *slot = criterion.measure(sub, random);
        }
    }

    /// Compares the current candidate with the accepted best.
    pub fn compare_to_best(&self) -> Verdict {
        let Some(best) = &self.best else {
            return Verdict::Better;
        };
        for ((criterion, &cur), &old) in self.criteria.iter().zip(&self.current).zip(best) {
            let (a, b) = (criterion.key(cur), criterion.key(old));
            if a > b {
                return Verdict::Better;
            }
            if a < b {
                return Verdict::Worse;
            }
        }
        Verdict::Tie
    }

    /// Quality of the current candidate in `[0, 1]`, taken from the
    /// highest-priority criterion that measures something real.
    pub fn quality_estimate(&self) -> f64 {
        self.criteria
            .iter()
            .zip(&self.current)
            .find(|(c, _)| !matches!(c, Criterion::RandomTieBreak))
            .map_or(0.0, |(c, &raw)| c.quality(raw, self.max_combo))
    }

    /// Human-readable summary of the current candidate.
    pub fn milestone_text(&self) -> String {
        self.criteria
            .iter()
            .zip(&self.current)
            .filter_map(|(c, &raw)| c.label(raw))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Makes the current candidate the best one.
    pub fn accept_as_best(&mut self) {
        match &mut self.best {
            Some(best) => best.copy_from_slice(&self.current),
            None => self.best = Some(self.current.clone()),
        }
    }

    pub fn has_best(&self) -> bool {
        self.best.is_some()
    }

    /// Raw measurement of the current candidate for the first criterion of
    /// the given kind, if the chain has one.
    pub fn current_value(&self, pick: impl Fn(&Criterion) -> bool) -> Option<i64> {
        self.criteria
            .iter()
            .zip(&self.current)
            .find(|(c, _)| pick(c))
            .map(|(_, &v)| v)
    }
}
