//! Tile types and type sets.
//!
//! A tile is a colour tag plus an "empowered" flag. The `Unknown` type marks
//! cells the board source could not classify; it never takes part in a match.

use serde::{Deserialize, Serialize};

/// The colour of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    Fire,
    Water,
    Wood,
    Light,
    Dark,
    Heart,
    Unknown,
}

/// Number of matchable colours (everything except `Unknown`).
pub const COLOR_COUNT: usize = 6;

/// All matchable colours, indexed by `TileType as usize`.
pub const ALL_COLORS: [TileType; COLOR_COUNT] = [
    TileType::Fire,
    TileType::Water,
    TileType::Wood,
    TileType::Light,
    TileType::Dark,
    TileType::Heart,
];

impl TileType {
    /// Returns true for every type except `Unknown`.
    pub const fn is_color(self) -> bool {
        !matches!(self, TileType::Unknown)
    }

    /// Returns the uppercase notation character.
    pub const fn notation_char(self) -> char {
        match self {
            TileType::Fire => 'R',
            TileType::Water => 'B',
            TileType::Wood => 'G',
            TileType::Light => 'L',
            TileType::Dark => 'D',
            TileType::Heart => 'H',
            TileType::Unknown => '?',
        }
    }

    /// Parses a type from its notation character (case-insensitive).
    pub fn from_notation_char(c: char) -> Option<TileType> {
        match c.to_ascii_uppercase() {
            'R' => Some(TileType::Fire),
            'B' => Some(TileType::Water),
            'G' => Some(TileType::Wood),
            'L' => Some(TileType::Light),
            'D' => Some(TileType::Dark),
            'H' => Some(TileType::Heart),
            '?' => Some(TileType::Unknown),
            _ => None,
        }
    }

    /// Returns the lowercase name used in option values and milestone text.
    pub const fn name(self) -> &'static str {
        match self {
            TileType::Fire => "fire",
            TileType::Water => "water",
            TileType::Wood => "wood",
            TileType::Light => "light",
            TileType::Dark => "dark",
            TileType::Heart => "heart",
            TileType::Unknown => "unknown",
        }
    }

    /// Parses a type from its lowercase name.
    pub fn from_name(s: &str) -> Option<TileType> {
        match s.to_ascii_lowercase().as_str() {
            "fire" => Some(TileType::Fire),
            "water" => Some(TileType::Water),
            "wood" => Some(TileType::Wood),
            "light" => Some(TileType::Light),
            "dark" => Some(TileType::Dark),
            "heart" => Some(TileType::Heart),
            "unknown" => Some(TileType::Unknown),
            _ => None,
        }
    }
}

/// A single stone on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileType,
    pub empowered: bool,
}

impl Tile {
    /// The filler tile dropped in from above after a cascade.
    pub const UNKNOWN: Tile = Tile {
        kind: TileType::Unknown,
        empowered: false,
    };

    /// Creates a plain (non-empowered) tile.
    pub const fn new(kind: TileType) -> Self {
        Tile {
            kind,
            empowered: false,
        }
    }

    /// Creates an empowered tile.
    pub const fn empowered(kind: TileType) -> Self {
        Tile {
            kind,
            empowered: true,
        }
    }

    /// Returns the notation character: uppercase, or lowercase when empowered.
    pub fn notation_char(self) -> char {
        let c = self.kind.notation_char();
        if self.empowered {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    /// Parses a tile from a notation character.
    pub fn from_notation_char(c: char) -> Option<Tile> {
        let kind = TileType::from_notation_char(c)?;
        Some(Tile {
            kind,
            empowered: c.is_ascii_lowercase(),
        })
    }
}

/// A set of tile colours stored as a bitset indexed by `TileType as usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TileType>", into = "Vec<TileType>")]
pub struct TypeSet(u8);

impl TypeSet {
    pub const EMPTY: TypeSet = TypeSet(0);

    /// Every matchable colour.
    pub const ALL: TypeSet = TypeSet((1 << COLOR_COUNT) - 1);

    /// Every colour except Heart, the usual group-attack set.
    pub const ATTACK: TypeSet = TypeSet(TypeSet::ALL.0 & !(1 << TileType::Heart as u8));

    pub const fn contains(self, kind: TileType) -> bool {
        kind.is_color() && self.0 & (1 << kind as u8) != 0
    }

    pub const fn with(self, kind: TileType) -> TypeSet {
        if kind.is_color() {
            TypeSet(self.0 | (1 << kind as u8))
        } else {
            self
        }
    }

    pub const fn without(self, kind: TileType) -> TypeSet {
        TypeSet(self.0 & !(1 << kind as u8))
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the colours in the set in `TileType` order.
    pub fn iter(self) -> impl Iterator<Item = TileType> {
        ALL_COLORS.into_iter().filter(move |&k| self.contains(k))
    }
}

impl FromIterator<TileType> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TileType>>(iter: I) -> Self {
        iter.into_iter().fold(TypeSet::EMPTY, TypeSet::with)
    }
}

impl From<Vec<TileType>> for TypeSet {
    fn from(kinds: Vec<TileType>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<TypeSet> for Vec<TileType> {
    fn from(set: TypeSet) -> Self {
        set.iter().collect()
    }
}
