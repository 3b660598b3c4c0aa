//! Solver configuration.
//!
//! One serde-friendly struct gathers everything a search needs: which
//! algorithm, the limits, the move constraints, the scoring chain and the
//! per-algorithm tunables. It can come from a JSON file, a JSON string, or
//! field by field from protocol `setoption` commands.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::TypeSet;
use crate::movegen::{standard_constraints, Constraint, Constraints};
use crate::scoring::{Criterion, ScoringChain};
use crate::search::{IdaConfig, SearchStrategy, UctConfig};

/// Default search time in milliseconds.
pub const DEFAULT_MOVETIME_MS: u64 = 5000;

/// Largest accepted `max_depth`.
pub const MAX_DEPTH: usize = 64;

/// Largest accepted IDA* heuristic factor.
pub const MAX_FACTOR: u32 = 100;

/// Largest accepted IDA* combo target.
pub const MAX_TARGET_COMBO: u32 = 64;

/// Largest accepted cost of a single move.
pub const MAX_MOVE_COST: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown option {0:?}")]
    UnknownOption(String),

    #[error("bad value {value:?} for option {name}")]
    BadValue { name: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Exhaustive,
    IdaStar,
    Uct,
    /// Every other algorithm at once; the best candidate wins.
    Race,
}

impl Algorithm {
    /// What `Race` runs.
    pub const RACE_MEMBERS: [Algorithm; 3] = [Algorithm::Exhaustive, Algorithm::IdaStar, Algorithm::Uct];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Exhaustive => "exhaustive",
            Algorithm::IdaStar => "idastar",
            Algorithm::Uct => "uct",
            Algorithm::Race => "race",
        }
    }

    /// Parses a protocol option value, case-insensitively.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exhaustive" | "dfs" => Some(Algorithm::Exhaustive),
            "idastar" | "ida_star" | "ida*" | "ida" => Some(Algorithm::IdaStar),
            "uct" | "mcts" => Some(Algorithm::Uct),
            "race" => Some(Algorithm::Race),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    /// Time limit in milliseconds; 0 means none.
    pub movetime_ms: u64,
    /// Longest path, in moves, the exhaustive search and UCT consider.
    pub max_depth: usize,
    pub allow_diagonal: bool,
    pub forbid_u_turn: bool,
    pub forbid_useless_first_swap: bool,
    /// Types the drag may start on; None allows any cell.
    pub start_types: Option<TypeSet>,
    pub strategy: SearchStrategy,
    /// Scoring chain used by the exhaustive search, highest priority first.
    pub criteria: Vec<Criterion>,
    pub ida: IdaConfig,
    pub uct: UctConfig,
    /// Seed for the random tie-break; 0 seeds from entropy.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            algorithm: Algorithm::Exhaustive,
            movetime_ms: DEFAULT_MOVETIME_MS,
            max_depth: 6,
            allow_diagonal: true,
            forbid_u_turn: true,
            forbid_useless_first_swap: true,
            start_types: None,
            strategy: SearchStrategy::Exhaustive,
            criteria: vec![Criterion::MaxCombo, Criterion::MinSteps],
            ida: IdaConfig::default(),
            uct: UctConfig::default(),
            seed: 0,
        }
    }
}

impl SolverConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        SolverConfig::from_json(&text)
    }

    /// Parses and validates a JSON config. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values no search can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return invalid("max_depth must be between 1 and 64");
        }
        if self.ida.factor == 0 || self.ida.factor > MAX_FACTOR {
            return invalid("ida.factor must be between 1 and 100");
        }
        if self.ida.target_combo.is_some_and(|t| t == 0 || t > MAX_TARGET_COMBO) {
            return invalid("ida.target_combo must be between 1 and 64");
        }
        let costs = 1..=MAX_MOVE_COST;
        if !costs.contains(&self.ida.move_cost.orthogonal) || !costs.contains(&self.ida.move_cost.diagonal) {
            return invalid("ida.move_cost entries must be between 1 and 100");
        }
        if self.uct.points_per_combo == 0 {
            return invalid("uct.points_per_combo must be at least 1");
        }
        if self.uct.max_nodes < 2 {
            return invalid("uct.max_nodes must be at least 2");
        }
        if !(self.uct.exploration >= 0.0 && self.uct.exploration.is_finite()) {
            return invalid("uct.exploration must be a finite non-negative number");
        }
        for criterion in &self.criteria {
            if let Criterion::TypeUsage { lower, upper, .. } = criterion {
                if lower > upper {
                    return invalid("type_usage lower bound above upper bound");
                }
            }
        }
        Ok(())
    }

    /// Deadline for a search started at `from`.
    pub fn deadline(&self, from: Instant) -> Option<Instant> {
        (self.movetime_ms > 0).then(|| from + Duration::from_millis(self.movetime_ms))
    }

    /// The move constraints these settings describe.
    pub fn constraints(&self) -> Constraints {
        let mut c = standard_constraints(
            self.allow_diagonal,
            self.forbid_u_turn,
            self.forbid_useless_first_swap,
        );
        if let Some(types) = self.start_types {
            c.push(Constraint::StartTypes(types));
        }
        c
    }

    pub fn scoring_chain(&self) -> ScoringChain {
        ScoringChain::new(self.criteria.clone(), self.seed)
    }

    /// Applies one protocol option. `ConfigFile` replaces the whole config.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let raw = value.unwrap_or("").trim();
        let bad = || ConfigError::BadValue {
            name: name.to_string(),
            value: raw.to_string(),
        };
        match name {
            "SearchTime" => self.movetime_ms = raw.parse().map_err(|_| bad())?,
            "Algorithm" => self.algorithm = Algorithm::from_name(raw).ok_or_else(bad)?,
            "MaxDepth" => {
                let depth: usize = raw.parse().map_err(|_| bad())?;
                if depth == 0 || depth > MAX_DEPTH {
                    return Err(bad());
                }
                self.max_depth = depth;
            }
            "Diagonals" => self.allow_diagonal = parse_bool(raw).ok_or_else(bad)?,
            "UTurns" => self.forbid_u_turn = !parse_bool(raw).ok_or_else(bad)?,
            "Iterations" => {
                let n: u64 = raw.parse().map_err(|_| bad())?;
                self.uct.iterations = (n > 0).then_some(n);
            }
            "Factor" => {
                let factor: u32 = raw.parse().map_err(|_| bad())?;
                if factor == 0 || factor > MAX_FACTOR {
                    return Err(bad());
                }
                self.ida.factor = factor;
            }
            "Target" => {
                let n: u32 = raw.parse().map_err(|_| bad())?;
                if n > MAX_TARGET_COMBO {
                    return Err(bad());
                }
                self.ida.target_combo = (n > 0).then_some(n);
            }
            "Seed" => self.seed = raw.parse().map_err(|_| bad())?,
            "ConfigFile" => *self = SolverConfig::load(raw)?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}
