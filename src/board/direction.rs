//! Drag directions.
//!
//! Eight symmetric directions: four orthogonal, four diagonal. Notation uses
//! numeric-keypad digits (`8` up, `6` right, `9` up-right, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Every direction, orthogonal ones first.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
];

/// The four orthogonal directions.
pub const ORTHOGONAL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// `(dx, dy)` with `dy > 0` pointing down.
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }

    /// Returns the keypad digit used in path notation.
    pub const fn notation_char(self) -> char {
        match self {
            Direction::Up => '8',
            Direction::Down => '2',
            Direction::Left => '4',
            Direction::Right => '6',
            Direction::UpLeft => '7',
            Direction::UpRight => '9',
            Direction::DownLeft => '1',
            Direction::DownRight => '3',
        }
    }

    /// Parses a direction from its keypad digit.
    pub fn from_notation_char(c: char) -> Option<Direction> {
        match c {
            '8' => Some(Direction::Up),
            '2' => Some(Direction::Down),
            '4' => Some(Direction::Left),
            '6' => Some(Direction::Right),
            '7' => Some(Direction::UpLeft),
            '9' => Some(Direction::UpRight),
            '1' => Some(Direction::DownLeft),
            '3' => Some(Direction::DownRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution_and_negates_offset() {
        for d in ALL_DIRECTIONS {
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.offset();
            assert_eq!(d.opposite().offset(), (-dx, -dy));
            assert_eq!(d.opposite().is_diagonal(), d.is_diagonal());
        }
    }

    #[test]
    fn diagonal_flag_matches_offset() {
        for d in ALL_DIRECTIONS {
            let (dx, dy) = d.offset();
            assert_eq!(d.is_diagonal(), dx != 0 && dy != 0);
        }
        assert!(ORTHOGONAL_DIRECTIONS.iter().all(|d| !d.is_diagonal()));
    }

    #[test]
    fn notation_roundtrip() {
        for d in ALL_DIRECTIONS {
            assert_eq!(Direction::from_notation_char(d.notation_char()), Some(d));
        }
        assert_eq!(Direction::from_notation_char('5'), None);
    }
}
