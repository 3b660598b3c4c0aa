//! Board representation.
//!
//! `Board` is the mutable working copy a search owns and mutates in place.
//! `Snapshot` is the immutable, cheaply shared form handed in by the board
//! source and compared by value.

use std::fmt;
use std::sync::Arc;

use super::direction::Direction;
use super::mask::{CellMask, MaskLayout};
use super::tile::{Tile, TileType, ALL_COLORS, COLOR_COUNT};

/// Errors raised when constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("board {width}x{height} needs {bits} mask bits, more than fit in a 64-bit word")]
    TooLarge {
        width: usize,
        height: usize,
        bits: usize,
    },

    #[error("expected {expected} cells for the board, got {got}")]
    CellCount { expected: usize, got: usize },
}

/// A board coordinate. `y == 0` is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A mutable grid of tiles in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    layout: MaskLayout,
    cells: Vec<Tile>,
}

impl Board {
    /// Creates a board from row-major tiles.
    pub fn new(width: usize, height: usize, cells: Vec<Tile>) -> Result<Self, BoardError> {
        let layout = MaskLayout::new(width, height)?;
        let expected = width * height;
        if cells.len() != expected {
            return Err(BoardError::CellCount {
                expected,
                got: cells.len(),
            });
        }
        Ok(Board { layout, cells })
    }

    /// Creates a board with every cell set to `tile`.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Result<Self, BoardError> {
        Board::new(width, height, vec![tile; width * height])
    }

    /// Creates a board from rows of tile types, top row first.
    pub fn from_rows(rows: &[&[TileType]]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let cells: Vec<Tile> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&k| Tile::new(k)))
            .collect();
        Board::new(width, height, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.layout.height()
    }

    #[inline]
    pub fn layout(&self) -> &MaskLayout {
        &self.layout
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.x < self.width() && cell.y < self.height(),
            "cell {} outside {}x{} board",
            cell,
            self.width(),
            self.height()
        );
        cell.y * self.width() + cell.x
    }

    /// Returns the tile at a cell. Panics if the cell is off the board.
    #[inline]
    pub fn get(&self, cell: Cell) -> Tile {
        self.cells[self.index(cell)]
    }

    /// Replaces the tile at a cell. Panics if the cell is off the board.
    #[inline]
    pub fn set(&mut self, cell: Cell, tile: Tile) {
        let idx = self.index(cell);
        self.cells[idx] = tile;
    }

    /// Swaps the tiles at two cells.
    #[inline]
    pub fn swap(&mut self, a: Cell, b: Cell) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
    }

    /// Row-major tiles.
    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterates every cell coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = (self.width(), self.height());
        (0..h).flat_map(move |y| (0..w).map(move |x| Cell::new(x, y)))
    }

    /// Returns the neighbour of `cell` in `dir`, or None at the edge.
    #[inline]
    pub fn neighbor(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.offset();
        let x = cell.x.checked_add_signed(dx as isize)?;
        let y = cell.y.checked_add_signed(dy as isize)?;
        if x < self.width() && y < self.height() {
            Some(Cell::new(x, y))
        } else {
            None
        }
    }

    /// Bitmask of every cell holding the given type.
    pub fn type_mask(&self, kind: TileType) -> CellMask {
        let mut m = CellMask::EMPTY;
        for (cell, tile) in self.coords().zip(self.cells.iter()) {
            if tile.kind == kind {
                m = m.union(self.layout.cell_mask(cell));
            }
        }
        m
    }

    /// Bitmasks for every colour at once, indexed by `TileType as usize`.
    pub fn color_masks(&self) -> [CellMask; COLOR_COUNT] {
        let mut masks = [CellMask::EMPTY; COLOR_COUNT];
        for (cell, tile) in self.coords().zip(self.cells.iter()) {
            if tile.kind.is_color() {
                let m = &mut masks[tile.kind as usize];
                *m = m.union(self.layout.cell_mask(cell));
            }
        }
        masks
    }

    /// Count of each colour, indexed by `TileType as usize`.
    pub fn color_counts(&self) -> [u32; COLOR_COUNT] {
        let mut counts = [0u32; COLOR_COUNT];
        for tile in &self.cells {
            if tile.kind.is_color() {
                counts[tile.kind as usize] += 1;
            }
        }
        counts
    }

    /// Returns the single colour present if every known tile shares it.
    pub fn pure_color(&self) -> Option<TileType> {
        let counts = self.color_counts();
        let mut present = ALL_COLORS.iter().filter(|&&k| counts[k as usize] > 0);
        let first = present.next()?;
        if present.next().is_some() {
            None
        } else {
            Some(*first)
        }
    }

    /// Freezes the board into a shareable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::new(self.clone()))
    }
}

impl fmt::Display for Board {
    /// Writes one line per row using notation characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width()).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.notation_char())?;
            }
        }
        Ok(())
    }
}

/// Immutable shared board. Clones share storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot(Arc<Board>);

impl Snapshot {
    /// Returns a fresh working copy.
    pub fn to_board(&self) -> Board {
        (*self.0).clone()
    }

    pub fn board(&self) -> &Board {
        &self.0
    }
}

impl std::ops::Deref for Snapshot {
    type Target = Board;

    fn deref(&self) -> &Board {
        &self.0
    }
}

impl From<Board> for Snapshot {
    fn from(board: Board) -> Self {
        Snapshot(Arc::new(board))
    }
}
