//! Board representation.
//!
//! Tiles, the grid itself (working copy and shared snapshot), the padded
//! bitmask layout used by the resolver, drag directions, paths, and the
//! scoped-swap guards searches use to mutate a board in place.

pub mod direction;
pub mod grid;
pub mod mask;
pub mod path;
pub mod swap;
pub mod tile;

pub use direction::{Direction, ALL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};
pub use grid::{Board, BoardError, Cell, Snapshot};
pub use mask::{CellMask, MaskLayout};
pub use path::Path;
pub use swap::{SwapGuard, SwapTrail};
pub use tile::{Tile, TileType, TypeSet, ALL_COLORS, COLOR_COUNT};
