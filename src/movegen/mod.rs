//! Legal move generation.
//!
//! The held tile moves to any of its up to eight neighbours; which ones are
//! legal depends on the active `Constraints`. This module also replays a
//! finished path through the same rules, which the front end uses to check
//! externally supplied paths before acting on them.

pub mod constraint;

use thiserror::Error;

use crate::board::{Board, Cell, Direction, Path};

pub use constraint::{Constraint, Constraints, MoveContext, MoveFn, MoveList, StartFn};

/// Why a path was rejected during replay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("start cell {0} is off the board")]
    StartOffBoard(Cell),

    #[error("drag may not start at {0}")]
    IllegalStart(Cell),

    #[error("move {index} ({direction:?}) from {from} is not legal")]
    IllegalMove {
        index: usize,
        direction: Direction,
        from: Cell,
    },
}

/// Re-derives `path` step by step through the move model and returns the
/// resulting board. Fails at the first step the constraints reject.
pub fn replay(board: &Board, path: &Path, constraints: &Constraints) -> Result<Board, ReplayError> {
    let start = path.start;
    if start.x >= board.width() || start.y >= board.height() {
        return Err(ReplayError::StartOffBoard(start));
    }
    if !constraints.can_start(start, board) {
        return Err(ReplayError::IllegalStart(start));
    }

    let mut work = board.clone();
    let mut from = start;
    for (index, &direction) in path.moves.iter().enumerate() {
        let remaining = path.len() - index - 1;
        let legal = constraints.legal_moves(&work, start, &path.moves[..index], from, remaining);
        let target = legal
            .as_slice()
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|&(_, cell)| cell)
            .ok_or(ReplayError::IllegalMove {
                index,
                direction,
                from,
            })?;
        work.swap(from, target);
        from = target;
    }
    Ok(work)
}

/// Standard constraint set built from the usual toggles.
pub fn standard_constraints(allow_diagonal: bool, forbid_u_turn: bool, forbid_useless_first: bool) -> Constraints {
    let mut c = Constraints::new();
    if !allow_diagonal {
        c.push(Constraint::NoDiagonal);
    }
    if forbid_u_turn {
        c.push(Constraint::NoUTurn);
    }
    if forbid_useless_first {
        c.push(Constraint::NoUselessFirstSwap);
    }
    c
}
