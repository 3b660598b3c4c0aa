//! Bitmask board encoding.
//!
//! Cell `(x, y)` maps to bit `y * (width + 1) + x`. The extra column per row
//! is always zero, so a one-bit shift never carries a cell from the end of
//! one row into the start of the next. Shifting by `stride` moves a cell one
//! row down or up.

use super::grid::{BoardError, Cell};

/// Word used for cell masks.
pub type MaskWord = u64;

/// Number of bits in a mask word.
pub const MASK_BITS: usize = MaskWord::BITS as usize;

/// Shift left that yields zero instead of overflowing.
#[inline]
pub(crate) fn shl(m: MaskWord, n: usize) -> MaskWord {
    if n >= MASK_BITS {
        0
    } else {
        m << n
    }
}

/// Shift right that yields zero instead of overflowing.
#[inline]
pub(crate) fn shr(m: MaskWord, n: usize) -> MaskWord {
    if n >= MASK_BITS {
        0
    } else {
        m >> n
    }
}

/// Geometry of the padded bit layout for one board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskLayout {
    width: usize,
    height: usize,
    stride: usize,
    full: MaskWord,
}

impl MaskLayout {
    /// Builds the layout, failing if the padded board does not fit a mask word.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }
        let stride = width + 1;
        let bits = stride.checked_mul(height).unwrap_or(usize::MAX);
        if bits > MASK_BITS {
            return Err(BoardError::TooLarge {
                width,
                height,
                bits,
            });
        }

        let row: MaskWord = shl(1, width) - 1;
        let mut full: MaskWord = 0;
        for y in 0..height {
            full |= shl(row, y * stride);
        }

        Ok(MaskLayout {
            width,
            height,
            stride,
            full,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bit distance between vertically adjacent cells.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Mask with every real (non-padding) cell set.
    pub fn full(&self) -> CellMask {
        CellMask(self.full)
    }

    /// Bit index of a cell.
    #[inline]
    pub fn bit(&self, cell: Cell) -> usize {
        debug_assert!(cell.x < self.width && cell.y < self.height);
        cell.y * self.stride + cell.x
    }

    /// Single-cell mask.
    #[inline]
    pub fn cell_mask(&self, cell: Cell) -> CellMask {
        CellMask(1 << self.bit(cell))
    }

    /// Cell for a bit index. The bit must not be a padding bit.
    #[inline]
    pub fn cell(&self, bit: usize) -> Cell {
        debug_assert!(bit % self.stride < self.width);
        Cell::new(bit % self.stride, bit / self.stride)
    }

    /// Grows a mask by one step in the four orthogonal directions, clipped
    /// to the board.
    #[inline]
    pub fn dilate(&self, m: CellMask) -> CellMask {
        let w = m.0;
        let grown = w | shl(w, 1) | shr(w, 1) | shl(w, self.stride) | shr(w, self.stride);
        CellMask(grown & self.full)
    }

    /// Cells that start a horizontal run of three inside `m`.
    #[inline]
    pub fn horizontal_triples(&self, m: CellMask) -> CellMask {
        let w = m.0;
        let starts = w & shr(w, 1) & shr(w, 2);
        CellMask(starts | shl(starts, 1) | shl(starts, 2))
    }

    /// Cells covered by a vertical run of three inside `m`.
    #[inline]
    pub fn vertical_triples(&self, m: CellMask) -> CellMask {
        let w = m.0;
        let s = self.stride;
        let starts = w & shr(w, s) & shr(w, 2 * s);
        CellMask(starts | shl(starts, s) | shl(starts, 2 * s))
    }

    /// Iterates the cells of a mask in bit order (row-major, top first).
    pub fn cells(&self, m: CellMask) -> impl Iterator<Item = Cell> + '_ {
        m.bits().map(move |bit| self.cell(bit))
    }
}

/// A set of board cells as a padded bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellMask(pub MaskWord);

impl CellMask {
    pub const EMPTY: CellMask = CellMask(0);

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn intersects(self, other: CellMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn union(self, other: CellMask) -> CellMask {
        CellMask(self.0 | other.0)
    }

    #[inline]
    pub fn minus(self, other: CellMask) -> CellMask {
        CellMask(self.0 & !other.0)
    }

    #[inline]
    pub fn lowest(self) -> CellMask {
        CellMask(self.0 & self.0.wrapping_neg())
    }

    /// Iterates the set bit indices in ascending order.
    pub fn bits(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let bit = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(bit)
        })
    }
}
