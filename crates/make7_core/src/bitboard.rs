//! Bitboard representation of the 7x7 Make 7 grid.
//!
//! Each column owns an 8-bit lane of a `u64`: bits `8c..8c+6` are the cells
//! of column `c` from bottom to top and bit `8c+7` is a guard that is never
//! set, so vertical carries and diagonal steps cannot leak into the next
//! column. Bits 56..63 are unused.

use std::ops::{Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::types::{COLUMNS, LANE};

/// A set of cells on the Make 7 grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    /// Every playable cell.
    pub const ALL: Bitboard = Bitboard(0x007f_7f7f_7f7f_7f7f);
    /// Bottom cell of every column.
    pub const BOTTOM: Bitboard = Bitboard(0x0001_0101_0101_0101);
    /// Guard bit above every column.
    pub const TOP: Bitboard = Bitboard(0x0080_8080_8080_8080);
    /// The only cells a 3 tile may land on.
    pub const THREES: Bitboard = Bitboard(0x0004_1020_0820_1004);
    /// Single-column lane mask, shift by `8 * column`.
    pub const LANE_MASK: u64 = 0x7f;

    /// Create a bitboard with a single cell set.
    #[inline(always)]
    pub const fn from_cell(cell: u8) -> Self {
        Bitboard(1u64 << cell)
    }

    /// All playable cells of one column.
    #[inline(always)]
    pub const fn column(column: u8) -> Self {
        Bitboard(Self::LANE_MASK << (column * LANE))
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a specific cell is set.
    #[inline(always)]
    pub const fn contains(self, cell: u8) -> bool {
        (self.0 & (1u64 << cell)) != 0
    }

    #[inline(always)]
    pub fn set(&mut self, cell: u8) {
        self.0 |= 1u64 << cell;
    }

    #[inline(always)]
    pub fn clear(&mut self, cell: u8) {
        self.0 &= !(1u64 << cell);
    }

    /// Count the number of set bits (population count).
    #[inline(always)]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Get and remove the least significant bit. Returns the cell index.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            let cell = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(cell)
        }
    }

    /// Reverse the order of the column lanes (A <-> G, B <-> F, C <-> E).
    pub const fn mirror(self) -> Bitboard {
        let mut out = 0u64;
        let mut c = 0;
        while c < COLUMNS as u8 {
            let lane = (self.0 >> (c * LANE)) & Self::LANE_MASK;
            out |= lane << ((COLUMNS as u8 - 1 - c) * LANE);
            c += 1;
        }
        Bitboard(out)
    }
}

/// Lane-wise addition; `occupied + BOTTOM` yields the next free cell of
/// every column (a full column carries into its guard bit).
impl Add for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Bitboard(self.0.wrapping_add(rhs.0))
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

/// Iterator over set cells in a bitboard.
impl Iterator for Bitboard {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }
}

#[cfg(test)]
#[path = "bitboard_tests.rs"]
mod bitboard_tests;
