//! Sum-of-seven detection.
//!
//! After a drop, the mover's tiles that touch the new tile along one line
//! form a contiguous run. The drop wins when any contiguous stretch of that
//! run adds up to exactly seven.

use crate::bitboard::Bitboard;

/// Target sum.
pub const SEVEN: u8 = 7;
/// Longest run through one cell: six cells either side plus the cell itself.
pub const MAX_RUN: usize = 13;

/// The four line directions, each identified by its cell-index step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Vertical,
    Horizontal,
    /// Bottom-left to top-right.
    Diagonal,
    /// Top-left to bottom-right.
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Vertical,
        Direction::Horizontal,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    #[inline(always)]
    pub const fn step(self) -> i8 {
        match self {
            Direction::Vertical => 1,
            Direction::Horizontal => 8,
            Direction::Diagonal => 9,
            Direction::AntiDiagonal => 7,
        }
    }
}

/// Tile values of a contiguous run, in line order.
#[derive(Clone, Copy, Debug)]
pub struct Run {
    values: [u8; MAX_RUN],
    len: usize,
}

impl Run {
    pub fn as_slice(&self) -> &[u8] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Face value of an occupied cell.
#[inline(always)]
pub fn tile_value(twos: Bitboard, threes: Bitboard, cell: u8) -> u8 {
    if twos.contains(cell) {
        2
    } else if threes.contains(cell) {
        3
    } else {
        1
    }
}

/// Walks from `origin` in one sense until a cell not owned by `own`.
/// Guard bits are never owned, so the walk cannot wrap into the next lane.
fn walk(own: Bitboard, origin: u8, step: i8, out: &mut [u8; 6]) -> usize {
    let mut len = 0;
    let mut idx = origin as i8 + step;
    while len < out.len() && (0..64).contains(&idx) && own.contains(idx as u8) {
        out[len] = idx as u8;
        len += 1;
        idx += step;
    }
    len
}

/// Collects the run of `own` tiles through `origin` along `dir`.
pub fn collect_run(own: Bitboard, twos: Bitboard, threes: Bitboard, origin: u8, dir: Direction) -> Run {
    let mut back = [0u8; 6];
    let mut fwd = [0u8; 6];
    let nb = walk(own, origin, -dir.step(), &mut back);
    let nf = walk(own, origin, dir.step(), &mut fwd);

    let mut run = Run {
        values: [0; MAX_RUN],
        len: 0,
    };
    let cells = back[..nb]
        .iter()
        .rev()
        .chain(std::iter::once(&origin))
        .chain(fwd[..nf].iter());
    for &c in cells {
        run.values[run.len] = tile_value(twos, threes, c);
        run.len += 1;
    }
    run
}

/// Sliding-window search for a contiguous stretch summing to seven.
/// All values are positive, so the window only ever moves right.
pub fn sums_to_seven(values: &[u8]) -> bool {
    // three tiles is the shortest possible seven
    if values.len() < 3 {
        return false;
    }
    let mut lo = 0;
    let mut sum = 0u8;
    for &v in values {
        sum += v;
        while sum > SEVEN {
            sum -= values[lo];
            lo += 1;
        }
        if sum == SEVEN {
            return true;
        }
    }
    false
}

/// True if the tile at `origin` completes a seven for the owner of `own`.
pub fn completes_seven(own: Bitboard, twos: Bitboard, threes: Bitboard, origin: u8) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| sums_to_seven(collect_run(own, twos, threes, origin, dir).as_slice()))
}

#[cfg(test)]
#[path = "win_tests.rs"]
mod win_tests;
