//! Board and path notation.
//!
//! Board notation lists rows from top to bottom separated by `/`, one
//! character per cell: `R` fire, `B` water, `G` wood, `L` light, `D` dark,
//! `H` heart, `?` unknown. A lowercase letter marks an empowered tile.
//!
//! Example (6x5): `RBGLDH/BGLDHR/GLDHRB/LDHRBG/DHRBGL`
//!
//! Path notation is the start cell `x,y` followed by `:` and one keypad digit
//! per move, e.g. `2,3:6627`.

use thiserror::Error;

use crate::board::{Board, BoardError, Cell, Direction, Path, Tile};

/// Errors that can occur when parsing board or path notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("invalid tile character '{0}'")]
    InvalidTile(char),

    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("path must look like 'x,y:moves', got '{0}'")]
    MalformedPath(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("invalid direction character '{0}'")]
    InvalidDirection(char),
}

/// Parses board notation into a working board.
pub fn parse_board(s: &str) -> Result<Board, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::EmptyInput);
    }

    let mut cells = Vec::new();
    let mut width = 0;
    let mut height = 0;

    for (row, line) in s.split('/').enumerate() {
        let before = cells.len();
        for c in line.chars() {
            let tile = Tile::from_notation_char(c).ok_or(NotationError::InvalidTile(c))?;
            cells.push(tile);
        }
        let got = cells.len() - before;
        if row == 0 {
            width = got;
        } else if got != width {
            return Err(NotationError::RaggedRow {
                row,
                expected: width,
                got,
            });
        }
        height += 1;
    }

    Ok(Board::new(width, height, cells)?)
}

/// Encodes a board into notation. Inverse of `parse_board`.
pub fn encode_board(board: &Board) -> String {
    let mut out = String::with_capacity(board.len() + board.height());
    for (i, row) in board.tiles().chunks(board.width()).enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.extend(row.iter().map(|t| t.notation_char()));
    }
    out
}

/// Parses path notation. Does not check the path against any board.
pub fn parse_path(s: &str) -> Result<Path, NotationError> {
    let s = s.trim();
    let (start, moves) = s
        .split_once(':')
        .ok_or_else(|| NotationError::MalformedPath(s.to_string()))?;
    let (x, y) = start
        .split_once(',')
        .ok_or_else(|| NotationError::MalformedPath(s.to_string()))?;

    let x: usize = x
        .trim()
        .parse()
        .map_err(|_| NotationError::InvalidCoordinate(x.to_string()))?;
    let y: usize = y
        .trim()
        .parse()
        .map_err(|_| NotationError::InvalidCoordinate(y.to_string()))?;

    let moves = moves
        .chars()
        .map(|c| Direction::from_notation_char(c).ok_or(NotationError::InvalidDirection(c)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Path::with_moves(Cell::new(x, y), moves))
}

/// Formats a path as notation. Same as its `Display` output.
pub fn format_path(path: &Path) -> String {
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileType;

    #[test]
    fn parse_simple_board() {
        let board = parse_board("RBG/LDH").unwrap();
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(board.get(Cell::new(2, 1)).kind, TileType::Heart);
    }

    #[test]
    fn parse_unknown_and_empowered() {
        let board = parse_board("?r").unwrap();
        assert_eq!(board.get(Cell::new(0, 0)), Tile::UNKNOWN);
        assert_eq!(board.get(Cell::new(1, 0)), Tile::empowered(TileType::Fire));
    }

    #[test]
    fn board_notation_roundtrip() {
        let s = "RBGLDH/bglDHR/??LDHR";
        assert_eq!(encode_board(&parse_board(s).unwrap()), s);
    }

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            parse_board("RBG/LD"),
            Err(NotationError::RaggedRow {
                row: 1,
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn rejects_bad_tiles_and_empty() {
        assert_eq!(parse_board("RXG"), Err(NotationError::InvalidTile('X')));
        assert_eq!(parse_board("   "), Err(NotationError::EmptyInput));
        assert!(matches!(
            parse_board("RB//GL"),
            Err(NotationError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_oversized_board() {
        let row = "R".repeat(8);
        let s = vec![row.as_str(); 8].join("/");
        assert!(matches!(
            parse_board(&s),
            Err(NotationError::Board(BoardError::TooLarge { .. }))
        ));
    }

    #[test]
    fn parse_path_notation() {
        let path = parse_path("2,3:6627").unwrap();
        assert_eq!(path.start, Cell::new(2, 3));
        assert_eq!(
            path.moves,
            vec![Direction::Right, Direction::Right, Direction::Down, Direction::UpLeft]
        );
        assert_eq!(format_path(&path), "2,3:6627");
    }

    #[test]
    fn parse_empty_path() {
        let path = parse_path("0,0:").unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(matches!(parse_path("23:66"), Err(NotationError::MalformedPath(_))));
        assert!(matches!(parse_path("a,3:66"), Err(NotationError::InvalidCoordinate(_))));
        assert_eq!(parse_path("1,1:65"), Err(NotationError::InvalidDirection('5')));
    }
}
