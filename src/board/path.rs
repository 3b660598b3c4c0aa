//! Drag paths.
//!
//! A path picks up the tile at `start` and drags it through the grid: each
//! direction swaps the held tile with its neighbour. A path of length n
//! touches n + 1 cells and performs n swaps.

use std::fmt;

use super::direction::Direction;
use super::grid::{Board, Cell};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub start: Cell,
    pub moves: Vec<Direction>,
}

impl Path {
    /// An empty path holding the tile at `start`.
    pub fn new(start: Cell) -> Self {
        Path {
            start,
            moves: Vec::new(),
        }
    }

    pub fn with_moves(start: Cell, moves: Vec<Direction>) -> Self {
        Path { start, moves }
    }

    /// Number of swaps.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last_move(&self) -> Option<Direction> {
        self.moves.last().copied()
    }

    /// Cells visited by the held tile, starting with `start`.
    ///
    /// Panics if the path walks off the board.
    pub fn cells(&self, board: &Board) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.moves.len() + 1);
        let mut cur = self.start;
        cells.push(cur);
        for &dir in &self.moves {
            cur = board
                .neighbor(cur, dir)
                .unwrap_or_else(|| panic!("path {} leaves the board at {}", self, cur));
            cells.push(cur);
        }
        cells
    }

    /// The cell where the held tile ends up.
    pub fn end(&self, board: &Board) -> Cell {
        self.cells(board).last().copied().unwrap_or(self.start)
    }

    /// Applies the swaps in order.
    pub fn apply(&self, board: &mut Board) {
        let mut cur = self.start;
        for &dir in &self.moves {
            let next = board
                .neighbor(cur, dir)
                .unwrap_or_else(|| panic!("path {} leaves the board at {}", self, cur));
            board.swap(cur, next);
            cur = next;
        }
    }

    /// Returns a copy of `board` with the path applied.
    pub fn applied_to(&self, board: &Board) -> Board {
        let mut out = board.clone();
        self.apply(&mut out);
        out
    }

    /// Number of diagonal moves.
    pub fn diagonal_count(&self) -> usize {
        self.moves.iter().filter(|d| d.is_diagonal()).count()
    }
}

impl fmt::Display for Path {
    /// `x,y:` followed by one keypad digit per move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.start)?;
        for d in &self.moves {
            write!(f, "{}", d.notation_char())?;
        }
        Ok(())
    }
}
