use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Make7Error;

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 7;
pub const AREA: usize = COLUMNS * ROWS;
/// Bits reserved per column; the top bit of each lane is a guard.
pub const LANE: u8 = 8;

/// Tiles each player starts with, indexed by `Tile::idx`.
pub const START_TILES: [u8; 3] = [11, 11, 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}
impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
    pub fn from_ply(ply: usize) -> Player {
        if ply & 1 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tile {
    One,
    Two,
    Three,
}

impl Tile {
    pub const ALL: [Tile; 3] = [Tile::One, Tile::Two, Tile::Three];
    /// Strongest tiles first; search order for the solver.
    pub const DESCENDING: [Tile; 3] = [Tile::Three, Tile::Two, Tile::One];

    pub fn value(self) -> u8 {
        self.idx() as u8 + 1
    }
    pub fn idx(self) -> usize {
        match self {
            Tile::One => 0,
            Tile::Two => 1,
            Tile::Three => 2,
        }
    }
    pub fn from_value(v: u8) -> Option<Tile> {
        match v {
            1 => Some(Tile::One),
            2 => Some(Tile::Two),
            3 => Some(Tile::Three),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub tile: Tile,
    pub column: u8, // 0..7
}

impl Move {
    pub fn new(tile: Tile, column: u8) -> Self {
        Self { tile, column }
    }

    /// The same drop reflected across the centre column.
    pub fn mirrored(self) -> Self {
        Self {
            tile: self.tile,
            column: (COLUMNS as u8 - 1) - self.column,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tile.value(), column_letter(self.column))
    }
}

impl FromStr for Move {
    type Err = Make7Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 {
            return Err(Make7Error::InvalidNotation(s.to_string()));
        }
        let tile = Tile::from_value(b[0].wrapping_sub(b'0'))
            .ok_or_else(|| Make7Error::InvalidNotation(s.to_string()))?;
        let column =
            column_index(b[1] as char).ok_or_else(|| Make7Error::InvalidNotation(s.to_string()))?;
        Ok(Move::new(tile, column))
    }
}

// Helpers
pub fn cell(column: u8, row: u8) -> u8 {
    column * LANE + row
}
pub fn column_of(cell: u8) -> u8 {
    cell / LANE
}
pub fn row_of(cell: u8) -> u8 {
    cell % LANE
}

pub fn column_letter(column: u8) -> char {
    (b'A' + column) as char
}

pub fn column_index(c: char) -> Option<u8> {
    let c = c.to_ascii_uppercase();
    if ('A'..='G').contains(&c) {
        Some(c as u8 - b'A')
    } else {
        None
    }
}

/// Splits a move sequence such as `"2D2c3E"` into moves.
pub fn parse_moves(seq: &str) -> Result<Vec<Move>, Make7Error> {
    let compact: Vec<char> = seq.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err(Make7Error::InvalidNotation(seq.to_string()));
    }
    compact
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>().parse())
        .collect()
}
