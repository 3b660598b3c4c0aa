//! Engine state management.
//!
//! Holds the current board and solver configuration between protocol
//! commands and turns `go` into a `SearchJob` that the main loop runs on a
//! worker thread.

use std::io::{self, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::board::{Board, Snapshot};
use crate::config::{SolverConfig, MAX_DEPTH, MAX_FACTOR, MAX_TARGET_COMBO};
use crate::movegen::replay;
use crate::protocol::notation::{encode_board, parse_board, parse_path};
use crate::protocol::{GoParams, InfoWriter};
use crate::resolve::resolve;
use crate::search::{SearchController, SearchResult};

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    config: SolverConfig,
    board: Option<Board>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates an engine with the default configuration and no board.
    pub fn new() -> Self {
        Engine::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Engine { config, board: None }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Forgets the board and restores default options.
    pub fn new_puzzle(&mut self) {
        self.board = None;
        self.config = SolverConfig::default();
    }

    /// Sets the current board from its notation.
    pub fn set_board(&mut self, notation: &str) -> Result<(), String> {
        let board = parse_board(notation).map_err(|e| format!("failed to parse board: {}", e))?;
        self.board = Some(board);
        Ok(())
    }

    /// Sets an engine option. On error the configuration is unchanged.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
        self.config
            .set_option(name, value)
            .map_err(|e| format!("setoption {}: {}", name, e))
    }

    /// Handles the SPI handshake: id, options, protocol_version, and spiok.
    pub fn handle_spi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let d = SolverConfig::default();
        writeln!(out, "id name swapsolve")?;
        writeln!(out, "id author swapsolve developers")?;
        writeln!(
            out,
            "option name SearchTime type spin default {} min 0 max 600000",
            d.movetime_ms
        )?;
        writeln!(
            out,
            "option name Algorithm type combo default {} var exhaustive var idastar var uct var race",
            d.algorithm.name()
        )?;
        writeln!(
            out,
            "option name MaxDepth type spin default {} min 1 max {}",
            d.max_depth, MAX_DEPTH
        )?;
        writeln!(out, "option name Diagonals type check default {}", d.allow_diagonal)?;
        writeln!(out, "option name UTurns type check default {}", !d.forbid_u_turn)?;
        writeln!(
            out,
            "option name Iterations type spin default {} min 0 max 1000000000",
            d.uct.iterations.unwrap_or(0)
        )?;
        writeln!(
            out,
            "option name Factor type spin default {} min 1 max {}",
            d.ida.factor, MAX_FACTOR
        )?;
        writeln!(
            out,
            "option name Target type spin default {} min 0 max {}",
            d.ida.target_combo.unwrap_or(0),
            MAX_TARGET_COMBO
        )?;
        writeln!(out, "option name Seed type spin default {} min 0 max 18446744073709551615", d.seed)?;
        writeln!(out, "option name ConfigFile type string default <empty>")?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "spiok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Replays `path` on the current board under the configured constraints
    /// and writes what it produces.
    pub fn handle_verify<W: Write>(&self, path: &str, out: &mut W) -> io::Result<()> {
        let Some(board) = &self.board else {
            writeln!(out, "illegal no board set")?;
            return out.flush();
        };
        let outcome = parse_path(path)
            .map_err(|e| e.to_string())
            .and_then(|p| replay(board, &p, &self.config.constraints()).map_err(|e| e.to_string()));
        match outcome {
            Ok(after) => {
                let resolution = resolve(&after);
                writeln!(
                    out,
                    "verified combos {} board {}",
                    resolution.combo_count(),
                    encode_board(&resolution.board)
                )?;
            }
            Err(e) => writeln!(out, "illegal {}", e)?,
        }
        out.flush()
    }

    /// Builds the search for a `go` command without running it.
    pub fn prepare_go(&self, params: &GoParams) -> Result<SearchJob, String> {
        let board = self.board.as_ref().ok_or("go: no board set")?;
        let mut config = self.config.clone();
        if let Some(ms) = params.movetime {
            config.movetime_ms = ms;
        }
        if let Some(depth) = params.depth {
            config.max_depth = depth;
        }
        if let Some(n) = params.iterations {
            config.uct.iterations = (n > 0).then_some(n);
        }
        if params.infinite {
            config.movetime_ms = 0;
            config.uct.iterations = None;
        }
        let controller = SearchController::new(config).map_err(|e| format!("go: {}", e))?;
        Ok(SearchJob {
            controller,
            board: board.snapshot(),
        })
    }

    /// Runs a `go` search on the calling thread, writing to `out`.
    pub fn handle_go<W: Write + Send>(&self, params: &GoParams, out: W) -> Option<SearchResult> {
        match self.prepare_go(params) {
            Ok(job) => Some(job.run(out)),
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        }
    }
}

/// A configured search over a fixed board.
pub struct SearchJob {
    controller: SearchController,
    board: Snapshot,
}

impl SearchJob {
    /// Raising this flag makes `run` return with the best path so far.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.controller.stop_flag()
    }

    /// Runs the search, streaming `info` lines and ending with `bestpath`.
    pub fn run<W: Write + Send>(self, out: W) -> SearchResult {
        let mut info = InfoWriter::new(out);
        let result = self.controller.find_path(&self.board, &mut info);
        if let Err(e) = info.finish(&result) {
            eprintln!("failed to write search result: {}", e);
        }
        result
    }
}
