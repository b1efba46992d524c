//! Make 7 game state.
//!
//! A `Position` is a fixed-size value (no heap) that is mutated in place by
//! `drop` and restored by `undo`. Search code copies it freely.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::error::{Make7Error, Make7Result};
use crate::movegen::legal_moves;
use crate::types::*;
use crate::win;

/// Transposition key of a position: the primary key determines the layout
/// of both players' tiles and the side to move, the two masks tell tile
/// denominations apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub key: u64,
    pub twos: u64,
    pub threes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    occupancy: [Bitboard; 2],
    twos: Bitboard,
    threes: Bitboard,
    /// Unplayed tiles per player, indexed by `Tile::idx`.
    remaining: [[u8; 3]; 2],
    /// Absolute bit index of the next free cell in each column.
    heights: [u8; COLUMNS],
    history: [Option<Move>; AREA],
    ply: u8,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The empty starting grid.
    pub fn new() -> Self {
        let mut heights = [0u8; COLUMNS];
        for (c, h) in heights.iter_mut().enumerate() {
            *h = c as u8 * LANE;
        }
        Position {
            occupancy: [Bitboard::EMPTY; 2],
            twos: Bitboard::EMPTY,
            threes: Bitboard::EMPTY,
            remaining: [START_TILES; 2],
            heights,
            history: [None; AREA],
            ply: 0,
        }
    }

    /// Replays a move sequence such as `"2D2C3E"` from the empty grid.
    pub fn from_moves(seq: &str) -> Make7Result<Self> {
        let mut pos = Position::new();
        for mv in parse_moves(seq)? {
            pos.play(mv)?;
        }
        Ok(pos)
    }

    /// Checked `drop` for callers presenting a game: refuses moves once the
    /// game is over and reports illegal drops as errors.
    pub fn play(&mut self, mv: Move) -> Make7Result<()> {
        let ply = self.ply();
        if self.is_game_over() {
            return Err(Make7Error::GameOver { mv, ply });
        }
        if !self.drop(mv) {
            return Err(Make7Error::IllegalMove { mv, ply });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.ply as usize
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Player {
        Player::from_ply(self.ply())
    }

    #[inline(always)]
    pub fn occupancy(&self, player: Player) -> Bitboard {
        self.occupancy[player.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    pub fn twos(&self) -> Bitboard {
        self.twos
    }

    pub fn threes(&self) -> Bitboard {
        self.threes
    }

    pub fn ones(&self) -> Bitboard {
        self.occupied() & !(self.twos | self.threes)
    }

    #[inline(always)]
    pub fn remaining(&self, player: Player, tile: Tile) -> u8 {
        self.remaining[player.idx()][tile.idx()]
    }

    /// Number of tiles already in `column`.
    #[inline(always)]
    pub fn column_height(&self, column: u8) -> u8 {
        self.heights[column as usize] - column * LANE
    }

    /// Cell the next tile dropped into `column` lands on.
    #[inline(always)]
    pub fn landing_cell(&self, column: u8) -> u8 {
        self.heights[column as usize]
    }

    pub fn last_move(&self) -> Option<Move> {
        self.ply.checked_sub(1).and_then(|p| self.history[p as usize])
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history[..self.ply()].iter().flatten().copied()
    }

    /// Face value of the tile on `cell`, if any.
    pub fn tile_at(&self, cell: u8) -> Option<(Player, u8)> {
        let owner = if self.occupancy[0].contains(cell) {
            Player::First
        } else if self.occupancy[1].contains(cell) {
            Player::Second
        } else {
            return None;
        };
        Some((owner, win::tile_value(self.twos, self.threes, cell)))
    }

    // ------------------------------------------------------------------
    // Make / unmake
    // ------------------------------------------------------------------

    /// Whether the side to move may drop `mv` now.
    #[inline]
    pub fn can_drop(&self, mv: Move) -> bool {
        if mv.column as usize >= COLUMNS {
            return false;
        }
        let target = self.heights[mv.column as usize];
        if Bitboard::from_cell(target) & Bitboard::TOP != Bitboard::EMPTY {
            return false;
        }
        if self.remaining(self.side_to_move(), mv.tile) == 0 {
            return false;
        }
        mv.tile != Tile::Three || Bitboard::THREES.contains(target)
    }

    /// Drops a tile for the side to move. Returns false and leaves the
    /// position untouched if the drop is illegal.
    #[inline]
    pub fn drop(&mut self, mv: Move) -> bool {
        if !self.can_drop(mv) {
            return false;
        }
        let me = self.side_to_move().idx();
        let column = mv.column as usize;
        let target = self.heights[column];

        self.occupancy[me].set(target);
        match mv.tile {
            Tile::One => {}
            Tile::Two => self.twos.set(target),
            Tile::Three => self.threes.set(target),
        }
        self.remaining[me][mv.tile.idx()] -= 1;
        self.heights[column] += 1;
        self.history[self.ply as usize] = Some(mv);
        self.ply += 1;
        true
    }

    /// Takes back the most recent drop. Returns `None` on an empty grid.
    #[inline]
    pub fn undo(&mut self) -> Option<Move> {
        let ply = self.ply.checked_sub(1)?;
        let mv = self.history[ply as usize].take()?;
        self.ply = ply;

        let me = self.side_to_move().idx();
        let column = mv.column as usize;
        self.heights[column] -= 1;
        let target = self.heights[column];

        self.occupancy[me].clear(target);
        self.twos.clear(target);
        self.threes.clear(target);
        self.remaining[me][mv.tile.idx()] += 1;
        Some(mv)
    }

    // ------------------------------------------------------------------
    // Terminal queries
    // ------------------------------------------------------------------

    /// Whether the most recent drop completed a sum of seven.
    pub fn is_winning_sum(&self) -> bool {
        let Some(mv) = self.last_move() else {
            return false;
        };
        let mover = self.side_to_move().other();
        let cell = self.heights[mv.column as usize] - 1;
        win::completes_seven(self.occupancy(mover), self.twos, self.threes, cell)
    }

    /// True when the side to move holds no 1s or 2s and cannot place a 3.
    pub fn has_no_legal_moves(&self) -> bool {
        let me = self.side_to_move();
        if self.remaining(me, Tile::One) != 0 || self.remaining(me, Tile::Two) != 0 {
            return false;
        }
        self.remaining(me, Tile::Three) == 0 || (self.open_cells() & Bitboard::THREES).is_empty()
    }

    pub fn is_grid_full(&self) -> bool {
        self.ply() == AREA
    }

    /// No move is available: the mover is out of usable tiles or the grid
    /// is full. Either way the game is drawn.
    pub fn is_draw(&self) -> bool {
        self.is_grid_full() || self.has_no_legal_moves()
    }

    pub fn is_game_over(&self) -> bool {
        self.ply > 0 && (self.is_winning_sum() || self.is_draw())
    }

    /// The player who completed a seven, if any.
    pub fn winner(&self) -> Option<Player> {
        self.is_winning_sum().then(|| self.side_to_move().other())
    }

    /// The next free cell of every column that still has room.
    #[inline(always)]
    pub fn open_cells(&self) -> Bitboard {
        (self.occupied() + Bitboard::BOTTOM) & Bitboard::ALL
    }

    /// First legal drop that completes a seven for the side to move.
    pub fn winning_move(&mut self) -> Option<Move> {
        for mv in legal_moves(self) {
            self.drop(mv);
            let wins = self.is_winning_sum();
            self.undo();
            if wins {
                return Some(mv);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Hashing and symmetry
    // ------------------------------------------------------------------

    #[inline]
    pub fn fingerprint(&self) -> Fingerprint {
        let own = self.occupancy[self.side_to_move().idx()];
        Fingerprint {
            key: own.0 + self.occupancy[0].0 + self.occupancy[1].0 + Bitboard::BOTTOM.0,
            twos: self.twos.0,
            threes: self.threes.0,
        }
    }

    /// Whether the grid reads the same with the columns reversed.
    pub fn is_symmetric(&self) -> bool {
        self.occupancy[0].mirror() == self.occupancy[0]
            && self.occupancy[1].mirror() == self.occupancy[1]
            && self.twos.mirror() == self.twos
            && self.threes.mirror() == self.threes
    }

    /// The position with columns reversed and history mirrored.
    pub fn mirror(&self) -> Position {
        let mut out = *self;
        out.occupancy = [self.occupancy[0].mirror(), self.occupancy[1].mirror()];
        out.twos = self.twos.mirror();
        out.threes = self.threes.mirror();
        for c in 0..COLUMNS {
            let from = COLUMNS - 1 - c;
            out.heights[c] = c as u8 * LANE + self.column_height(from as u8);
        }
        for entry in out.history.iter_mut().flatten() {
            *entry = entry.mirrored();
        }
        out
    }

    /// Checks every structural invariant of the position.
    pub fn is_consistent(&self) -> bool {
        let occupied = self.occupied();
        if !(self.occupancy[0] & self.occupancy[1]).is_empty()
            || !(occupied & !Bitboard::ALL).is_empty()
            || !((self.twos | self.threes) & !occupied).is_empty()
            || !(self.twos & self.threes).is_empty()
            || !(self.threes & !Bitboard::THREES).is_empty()
        {
            return false;
        }
        for player in [Player::First, Player::Second] {
            let own = self.occupancy(player);
            let placed = [
                (own & !(self.twos | self.threes)).popcount(),
                (own & self.twos).popcount(),
                (own & self.threes).popcount(),
            ];
            for t in Tile::ALL {
                if placed[t.idx()] + self.remaining(player, t) as u32 != START_TILES[t.idx()] as u32 {
                    return false;
                }
            }
        }
        for c in 0..COLUMNS as u8 {
            let h = self.column_height(c);
            if h as usize > ROWS || (occupied & Bitboard::column(c)).0 >> (c * LANE) != (1u64 << h) - 1 {
                return false;
            }
        }
        occupied.popcount() as usize == self.ply()
            && self.history[..self.ply()].iter().all(Option::is_some)
            && self.history[self.ply()..].iter().all(Option::is_none)
    }
}

impl fmt::Display for Position {
    /// Own tiles of the first player print as `[n]`, the second player's as
    /// `(n)`. Empty cells where a 3 may land print as `*`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS as u8).rev() {
            for col in 0..COLUMNS as u8 {
                let c = cell(col, row);
                match self.tile_at(c) {
                    Some((Player::First, v)) => write!(f, "[{v}]")?,
                    Some((Player::Second, v)) => write!(f, "({v})")?,
                    None if Bitboard::THREES.contains(c) => write!(f, " * ")?,
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f)?;
        }
        for col in 0..COLUMNS as u8 {
            write!(f, " {} ", column_letter(col))?;
        }
        writeln!(f)?;
        for player in [Player::First, Player::Second] {
            writeln!(
                f,
                "{:?}: 1x{} 2x{} 3x{}",
                player,
                self.remaining(player, Tile::One),
                self.remaining(player, Tile::Two),
                self.remaining(player, Tile::Three)
            )?;
        }
        write!(f, "{:?} to move, ply {}", self.side_to_move(), self.ply)
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
