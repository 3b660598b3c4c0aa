//! Move legality constraints.
//!
//! A constraint answers two questions: may the drag start on this cell, and
//! may the held tile move in this direction given the path so far. A
//! `Constraints` list is their conjunction, evaluated in order; the empty
//! list allows everything on the board.

use std::fmt;
use std::sync::Arc;

use crate::board::{Board, Cell, Direction, TypeSet, ALL_DIRECTIONS};

/// Everything a constraint may look at when judging one move.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    /// Board with the path so far already applied.
    pub board: &'a Board,
    pub start: Cell,
    pub path: &'a [Direction],
    /// Cell currently holding the dragged tile.
    pub from: Cell,
    pub direction: Direction,
    /// Cell the held tile moves into.
    pub target: Cell,
    /// Moves the search may still make after this one.
    pub remaining: usize,
}

pub type StartFn = Arc<dyn Fn(Cell, &Board) -> bool + Send + Sync>;
pub type MoveFn = Arc<dyn Fn(&MoveContext<'_>) -> bool + Send + Sync>;

/// A single legality rule.
#[derive(Clone)]
pub enum Constraint {
    /// Only the four orthogonal directions.
    NoDiagonal,
    /// Never reverse the previous move.
    NoUTurn,
    /// The first swap may not exchange two tiles of the same type when more
    /// moves can follow, since it changes nothing.
    NoUselessFirstSwap,
    /// The drag may only start on tiles of these types.
    StartTypes(TypeSet),
    CustomStart(StartFn),
    CustomMove(MoveFn),
}

impl Constraint {
    pub fn can_start(&self, cell: Cell, board: &Board) -> bool {
        match self {
            Constraint::StartTypes(types) => types.contains(board.get(cell).kind),
            Constraint::CustomStart(f) => f(cell, board),
            _ => true,
        }
    }

    pub fn can_move(&self, ctx: &MoveContext<'_>) -> bool {
        match self {
            Constraint::NoDiagonal => !ctx.direction.is_diagonal(),
            Constraint::NoUTurn => ctx
                .path
                .last()
                .map_or(true, |last| last.opposite() != ctx.direction),
            Constraint::NoUselessFirstSwap => {
                !(ctx.path.is_empty()
                    && ctx.remaining > 0
                    && ctx.board.get(ctx.from).kind == ctx.board.get(ctx.target).kind)
            }
            Constraint::CustomMove(f) => f(ctx),
            _ => true,
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NoDiagonal => write!(f, "NoDiagonal"),
            Constraint::NoUTurn => write!(f, "NoUTurn"),
            Constraint::NoUselessFirstSwap => write!(f, "NoUselessFirstSwap"),
            Constraint::StartTypes(t) => f.debug_tuple("StartTypes").field(t).finish(),
            Constraint::CustomStart(_) => write!(f, "CustomStart(..)"),
            Constraint::CustomMove(_) => write!(f, "CustomMove(..)"),
        }
    }
}

/// Legal moves from one position: direction plus destination cell.
#[derive(Debug, Clone, Copy)]
pub struct MoveList {
    moves: [(Direction, Cell); 8],
    len: usize,
}

impl MoveList {
    fn new() -> Self {
        MoveList {
            moves: [(Direction::Up, Cell::new(0, 0)); 8],
            len: 0,
        }
    }

    fn push(&mut self, dir: Direction, cell: Cell) {
        self.moves[self.len] = (dir, cell);
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[(Direction, Cell)] {
        &self.moves[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.as_slice().iter().map(|&(d, _)| d)
    }
}

/// Conjunction of constraints.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    list: Vec<Constraint>,
}

impl Constraints {
    /// The empty conjunction: every on-board move is legal.
    pub fn new() -> Self {
        Constraints { list: Vec::new() }
    }

    /// Builder-style append.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.list.push(constraint);
        self
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.list.push(constraint);
    }

    /// Conjunction of `self` and `other`.
    pub fn and(mut self, other: Constraints) -> Self {
        self.list.extend(other.list);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.list.iter()
    }

    pub fn can_start(&self, cell: Cell, board: &Board) -> bool {
        self.list.iter().all(|c| c.can_start(cell, board))
    }

    pub fn can_move(&self, ctx: &MoveContext<'_>) -> bool {
        self.list.iter().all(|c| c.can_move(ctx))
    }

    /// Legal moves for the tile held at `from` after `path`.
    pub fn legal_moves(
        &self,
        board: &Board,
        start: Cell,
        path: &[Direction],
        from: Cell,
        remaining: usize,
    ) -> MoveList {
        let mut out = MoveList::new();
        for dir in ALL_DIRECTIONS {
            let Some(target) = board.neighbor(from, dir) else {
                continue;
            };
            let ctx = MoveContext {
                board,
                start,
                path,
                from,
                direction: dir,
                target,
                remaining,
            };
            if self.can_move(&ctx) {
                out.push(dir, target);
            }
        }
        out
    }
}

impl FromIterator<Constraint> for Constraints {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Constraints {
            list: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileType;
    use crate::protocol::notation::parse_board;

    fn board() -> Board {
        parse_board("RRB/GLD/HBG").unwrap()
    }

    fn dirs(list: &MoveList) -> Vec<Direction> {
        list.directions().collect()
    }

    #[test]
    fn empty_constraints_allow_all_on_board_moves() {
        let b = board();
        let center = Cell::new(1, 1);
        assert_eq!(Constraints::new().legal_moves(&b, center, &[], center, 5).len(), 8);
        let corner = Cell::new(0, 0);
        assert_eq!(
            dirs(&Constraints::new().legal_moves(&b, corner, &[], corner, 5)),
            vec![Direction::Down, Direction::Right, Direction::DownRight]
        );
    }

    #[test]
    fn no_diagonal_keeps_orthogonal() {
        let b = board();
        let c = Cell::new(1, 1);
        let list = Constraints::new()
            .with(Constraint::NoDiagonal)
            .legal_moves(&b, c, &[], c, 5);
        assert_eq!(list.len(), 4);
        assert!(list.directions().all(|d| !d.is_diagonal()));
    }

    #[test]
    fn no_u_turn_forbids_reversal() {
        let b = board();
        let start = Cell::new(0, 1);
        let path = [Direction::Right];
        let list = Constraints::new()
            .with(Constraint::NoUTurn)
            .legal_moves(&b, start, &path, Cell::new(1, 1), 5);
        assert!(!dirs(&list).contains(&Direction::Left));
        assert_eq!(list.len(), 7);
    }

    #[test]
    fn useless_first_swap_only_when_more_moves_follow() {
        let b = board();
        let start = Cell::new(0, 0);
        let constraints = Constraints::new().with(Constraint::NoUselessFirstSwap);

        let list = constraints.legal_moves(&b, start, &[], start, 3);
        assert!(!dirs(&list).contains(&Direction::Right));

        let last = constraints.legal_moves(&b, start, &[], start, 0);
        assert!(dirs(&last).contains(&Direction::Right));

        // Only the first swap is affected.
        let later = constraints.legal_moves(&b, start, &[Direction::Down], start, 3);
        assert!(dirs(&later).contains(&Direction::Right));
    }

    #[test]
    fn start_types_limit_pickup() {
        let b = board();
        let c = Constraints::new().with(Constraint::StartTypes(TypeSet::EMPTY.with(TileType::Fire)));
        assert!(c.can_start(Cell::new(0, 0), &b));
        assert!(!c.can_start(Cell::new(2, 0), &b));
        assert!(Constraints::new().can_start(Cell::new(2, 0), &b));
    }

    #[test]
    fn custom_constraints_compose() {
        let b = board();
        let only_down: MoveFn = Arc::new(|ctx: &MoveContext<'_>| ctx.direction == Direction::Down);
        let c = Constraints::new()
            .with(Constraint::NoDiagonal)
            .and(Constraints::new().with(Constraint::CustomMove(only_down)));
        let cell = Cell::new(1, 1);
        assert_eq!(dirs(&c.legal_moves(&b, cell, &[], cell, 1)), vec![Direction::Down]);

        let no_top: StartFn = Arc::new(|cell: Cell, _: &Board| cell.y > 0);
        let c = c.with(Constraint::CustomStart(no_top));
        assert!(!c.can_start(Cell::new(0, 0), &b));
        assert!(c.can_start(Cell::new(0, 1), &b));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn conjunction_is_associative() {
        let b = board();
        let a = Constraints::new().with(Constraint::NoDiagonal);
        let bb = Constraints::new().with(Constraint::NoUTurn);
        let c = Constraints::new().with(Constraint::NoUselessFirstSwap);
        let left = a.clone().and(bb.clone()).and(c.clone());
        let right = a.and(bb.and(c));
        let start = Cell::new(0, 0);
        for cell in b.coords() {
            assert_eq!(
                dirs(&left.legal_moves(&b, start, &[Direction::Right], cell, 2)),
                dirs(&right.legal_moves(&b, start, &[Direction::Right], cell, 2))
            );
        }
    }
}
