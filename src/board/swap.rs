//! Scoped swaps on a working board.
//!
//! Searches mutate one board in place. These guards undo their swaps when
//! dropped, so every exit from a recursive step (normal return, early return
//! on cancellation, unwinding) leaves the board as the caller saw it.

use std::ops::{Deref, DerefMut};

use super::grid::{Board, Cell};

/// Swaps two cells for the lifetime of the guard.
pub struct SwapGuard<'a> {
    board: &'a mut Board,
    a: Cell,
    b: Cell,
}

impl<'a> SwapGuard<'a> {
    pub fn new(board: &'a mut Board, a: Cell, b: Cell) -> Self {
        board.swap(a, b);
        SwapGuard { board, a, b }
    }
}

impl Deref for SwapGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for SwapGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for SwapGuard<'_> {
    fn drop(&mut self) {
        self.board.swap(self.a, self.b);
    }
}

/// A stack of swaps undone in reverse order on drop.
///
/// Used where the recursion is replaced by an explicit descent loop.
pub struct SwapTrail<'a> {
    board: &'a mut Board,
    swaps: Vec<(Cell, Cell)>,
}

impl<'a> SwapTrail<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        SwapTrail {
            board,
            swaps: Vec::new(),
        }
    }

    pub fn push(&mut self, a: Cell, b: Cell) {
        self.board.swap(a, b);
        self.swaps.push((a, b));
    }

    pub fn depth(&self) -> usize {
        self.swaps.len()
    }

    pub fn board(&self) -> &Board {
        self.board
    }
}

impl Drop for SwapTrail<'_> {
    fn drop(&mut self) {
        while let Some((a, b)) = self.swaps.pop() {
            self.board.swap(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tile::TileType::*;

    fn board() -> Board {
        Board::from_rows(&[&[Fire, Water, Wood], &[Light, Dark, Heart]]).unwrap()
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut b = board();
        {
            let guard = SwapGuard::new(&mut b, Cell::new(0, 0), Cell::new(2, 1));
            assert_eq!(guard.get(Cell::new(0, 0)).kind, Heart);
        }
        assert_eq!(b, board());
    }

    #[test]
    fn nested_guards_restore_in_order() {
        let mut b = board();
        {
            let mut outer = SwapGuard::new(&mut b, Cell::new(0, 0), Cell::new(1, 0));
            {
                let inner = SwapGuard::new(&mut outer, Cell::new(1, 0), Cell::new(2, 0));
                assert_eq!(inner.to_string(), "BGR\nLDH");
            }
            assert_eq!(outer.to_string(), "BRG\nLDH");
        }
        assert_eq!(b, board());
    }

    #[test]
    fn guard_restores_on_early_return() {
        fn swap_then_bail(board: &mut Board) -> Option<()> {
            let guard = SwapGuard::new(board, Cell::new(0, 0), Cell::new(0, 1));
            if guard.get(Cell::new(0, 0)).kind == Light {
                return None;
            }
            Some(())
        }
        let mut b = board();
        assert!(swap_then_bail(&mut b).is_none());
        assert_eq!(b, board());
    }

    #[test]
    fn trail_undoes_everything() {
        let mut b = board();
        {
            let mut trail = SwapTrail::new(&mut b);
            trail.push(Cell::new(0, 0), Cell::new(1, 0));
            trail.push(Cell::new(1, 0), Cell::new(1, 1));
            assert_eq!(trail.depth(), 2);
            assert_eq!(trail.board().to_string(), "BDG\nLRH");
        }
        assert_eq!(b, board());
    }
}
