//! Cascade resolution.
//!
//! Repeatedly removes every run of three or more identical colours, lets the
//! remaining tiles fall, and fills the gaps at the top with `Unknown` until a
//! pass finds nothing. Each pass is one batch; every connected same-colour
//! group removed in a batch becomes one combo.
//!
//! Runs are found per colour with shifted-mask tests on the padded layout:
//! `m & m>>1 & m>>2` marks horizontal run starts and the same with the row
//! stride marks vertical ones. Candidate runs that touch or overlap are then
//! merged by flood fill restricted to the matched cells.

use crate::board::{Board, Cell, CellMask, MaskLayout, Tile, TileType, ALL_COLORS};

/// A group of cells removed together in one cascade batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    pub cells: CellMask,
    pub kind: TileType,
    /// 0 for the first pass, 1 for what fell into place afterwards, ...
    pub batch: u32,
}

impl Combo {
    /// Number of tiles removed.
    #[inline]
    pub fn size(&self) -> u32 {
        self.cells.count()
    }

    /// Cell coordinates in row-major order.
    pub fn cell_list(&self, layout: &MaskLayout) -> Vec<Cell> {
        layout.cells(self.cells).collect()
    }
}

/// Output of a full cascade: the ordered combos and the settled board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub combos: Vec<Combo>,
    pub board: Board,
}

impl Resolution {
    pub fn combo_count(&self) -> usize {
        self.combos.len()
    }

    /// Number of batches that removed anything.
    pub fn batch_count(&self) -> u32 {
        self.combos.last().map_or(0, |c| c.batch + 1)
    }
}

/// Reusable resolver that keeps its combo buffer across calls.
///
/// Allocate once per search and call `resolve_in_place` on a scratch board;
/// the returned slice is valid until the next call.
#[derive(Debug, Default)]
pub struct Resolver {
    combos: Vec<Combo>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            combos: Vec::with_capacity(16),
        }
    }

    /// Resolves a copy of `board` and returns the combos plus the final board.
    pub fn resolve(&mut self, board: &Board) -> Resolution {
        let mut settled = board.clone();
        let combos = self.resolve_in_place(&mut settled).to_vec();
        Resolution {
            combos,
            board: settled,
        }
    }

    /// Runs the cascade on `board` itself, leaving it settled.
    pub fn resolve_in_place(&mut self, board: &mut Board) -> &[Combo] {
        self.combos.clear();
        let mut batch = 0;
        loop {
            let cleared = find_combos(board, batch, &mut self.combos);
            if cleared.is_empty() {
                break;
            }
            apply_gravity(board, cleared);
            batch += 1;
        }
        &self.combos
    }

    /// Finds only the first batch without modifying the board.
    pub fn first_batch(&mut self, board: &Board) -> &[Combo] {
        self.combos.clear();
        find_combos(board, 0, &mut self.combos);
        &self.combos
    }
}

/// Resolves a board with a throwaway resolver.
pub fn resolve(board: &Board) -> Resolution {
    Resolver::new().resolve(board)
}

/// Appends this pass's combos to `out` and returns the union of their cells.
fn find_combos(board: &Board, batch: u32, out: &mut Vec<Combo>) -> CellMask {
    let layout = board.layout();
    let masks = board.color_masks();
    let mut cleared = CellMask::EMPTY;

    for kind in ALL_COLORS {
        let m = masks[kind as usize];
        if m.count() < 3 {
            continue;
        }
        let mut matched = layout
            .horizontal_triples(m)
            .union(layout.vertical_triples(m));
        cleared = cleared.union(matched);

        while !matched.is_empty() {
            let mut group = matched.lowest();
            loop {
                let grown = CellMask(layout.dilate(group).0 & matched.0);
                if grown == group {
                    break;
                }
                group = grown;
            }
            matched = matched.minus(group);
            out.push(Combo {
                cells: group,
                kind,
                batch,
            });
        }
    }

    cleared
}

/// Drops the surviving tiles of each column to the bottom, keeping their
/// order, and fills the vacated top cells with `Unknown`.
fn apply_gravity(board: &mut Board, cleared: CellMask) {
    let layout = *board.layout();
    let (width, height) = (layout.width(), layout.height());

    for x in 0..width {
        let mut write = height;
        for y in (0..height).rev() {
            let cell = Cell::new(x, y);
            if cleared.intersects(layout.cell_mask(cell)) {
                continue;
            }
            write -= 1;
            if write != y {
                let tile = board.get(cell);
                board.set(Cell::new(x, write), tile);
            }
        }
        for y in 0..write {
            board.set(Cell::new(x, y), Tile::UNKNOWN);
        }
    }
}
