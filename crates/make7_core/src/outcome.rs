//! Game-theoretic results and their aggregation over candidate moves.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::movegen::COLUMN_ORDER;
use crate::types::{COLUMNS, Move, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
    Unknown,
}

/// A solved value from the point of view of the side to move.
///
/// `plies` is the search depth at which a forced win or loss was first
/// found; it is `None` for draws and unknown results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub plies: Option<u8>,
}

impl GameResult {
    pub const DRAW: GameResult = GameResult {
        outcome: Outcome::Draw,
        plies: None,
    };
    pub const UNKNOWN: GameResult = GameResult {
        outcome: Outcome::Unknown,
        plies: None,
    };

    pub const fn win(plies: u8) -> Self {
        GameResult {
            outcome: Outcome::Win,
            plies: Some(plies),
        }
    }

    pub const fn loss(plies: u8) -> Self {
        GameResult {
            outcome: Outcome::Loss,
            plies: Some(plies),
        }
    }

    pub fn is_known(self) -> bool {
        self.outcome != Outcome::Unknown
    }

    /// A child's result seen from its parent: wins and losses swap and the
    /// distance grows by one ply.
    pub fn parent_view(self) -> GameResult {
        let plies = self.plies.map(|p| p.saturating_add(1));
        match self.outcome {
            Outcome::Win => GameResult {
                outcome: Outcome::Loss,
                plies,
            },
            Outcome::Loss => GameResult {
                outcome: Outcome::Win,
                plies,
            },
            Outcome::Draw | Outcome::Unknown => self,
        }
    }

    /// Preference rank for move choice; larger is better.
    fn rank(self) -> (u8, i16) {
        let depth = self.plies.unwrap_or(0) as i16;
        match self.outcome {
            Outcome::Win => (3, -depth),
            Outcome::Draw => (2, 0),
            Outcome::Loss => (1, depth),
            Outcome::Unknown => (0, 0),
        }
    }

    /// Compares two results by preference: faster wins, then draws, then
    /// slower losses, then unknown.
    pub fn preference(self, other: GameResult) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.outcome, self.plies) {
            (Outcome::Win, Some(0)) => write!(f, "WIN"),
            (Outcome::Win, Some(p)) => write!(f, "W{p}"),
            (Outcome::Loss, Some(p)) => write!(f, "L{p}"),
            (Outcome::Win, None) => write!(f, "W"),
            (Outcome::Loss, None) => write!(f, "L"),
            (Outcome::Draw, _) => write!(f, "D"),
            (Outcome::Unknown, _) => write!(f, "--"),
        }
    }
}

/// One result per (tile, column) pair. Illegal drops stay unknown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTable {
    results: [[GameResult; COLUMNS]; 3],
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTable {
    pub fn new() -> Self {
        Self {
            results: [[GameResult::UNKNOWN; COLUMNS]; 3],
        }
    }

    pub fn get(&self, mv: Move) -> GameResult {
        self.results[mv.tile.idx()][mv.column as usize]
    }

    pub fn set(&mut self, mv: Move, result: GameResult) {
        self.results[mv.tile.idx()][mv.column as usize] = result;
    }

    /// Every entry, in search order (3s first, centre column first).
    pub fn iter(&self) -> impl Iterator<Item = (Move, GameResult)> + '_ {
        Tile::DESCENDING.into_iter().flat_map(move |tile| {
            COLUMN_ORDER.into_iter().map(move |column| {
                let mv = Move::new(tile, column);
                (mv, self.get(mv))
            })
        })
    }

    /// Copies every known entry onto the mirrored column.
    pub fn mirror_known(&mut self) {
        let known: Vec<(Move, GameResult)> = self.iter().filter(|(_, r)| r.is_known()).collect();
        for (mv, result) in known {
            self.set(mv.mirrored(), result);
        }
    }

    pub fn best_result(&self) -> GameResult {
        self.iter()
            .map(|(_, r)| r)
            .max_by(|a, b| a.preference(*b))
            .unwrap_or(GameResult::UNKNOWN)
    }

    /// All moves sharing the best known result, in search order.
    pub fn best_moves(&self) -> Vec<Move> {
        let best = self.best_result();
        if !best.is_known() {
            return Vec::new();
        }
        self.iter().filter(|(_, r)| *r == best).map(|(mv, _)| mv).collect()
    }
}

impl fmt::Display for MoveTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..COLUMNS as u8 {
            write!(f, "{:>5}", crate::types::column_letter(c))?;
        }
        for tile in Tile::ALL {
            writeln!(f)?;
            write!(f, "{} ", tile.value())?;
            for c in 0..COLUMNS as u8 {
                write!(f, "{:>5}", self.get(Move::new(tile, c)).to_string())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
