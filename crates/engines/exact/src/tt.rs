//! Transposition table for the exact solver.
//!
//! A direct-mapped, replace-always cache. The slot for a position is
//! `key % capacity` with a prime capacity. A slot answers a probe only when
//! all three fingerprint words match, so a collision is a miss and never a
//! wrong answer.

use log::warn;
use make7_core::{Fingerprint, Make7Error, Make7Result};

/// How a stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside its window.
    Exact,
    /// True value >= score (cutoff).
    Lower,
    /// True value <= score (no move raised alpha).
    Upper,
}

/// A cached search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub score: i32,
    pub bound: Bound,
    /// Remaining depth the score was computed with.
    pub depth: u8,
}

impl TtEntry {
    pub fn new(score: i32, bound: Bound, depth: u8) -> Self {
        Self { score, bound, depth }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    key: u64,
    twos: u64,
    threes: u64,
    entry: Option<TtEntry>,
}

/// Fixed-capacity position cache.
pub struct TranspositionTable {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl TranspositionTable {
    /// Allocates the largest prime number of slots not above `requested`.
    ///
    /// # Errors
    /// `TableTooSmall` below two slots, `TableAllocation` when the memory
    /// cannot be reserved. The caller may retry with a smaller size.
    pub fn new(requested: usize) -> Make7Result<Self> {
        if requested < 2 {
            return Err(Make7Error::TableTooSmall { requested });
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(requested)
            .map_err(|_| Make7Error::TableAllocation { entries: requested })?;
        let capacity = prev_prime(requested).ok_or(Make7Error::TableTooSmall { requested })?;
        slots.resize(capacity, Slot::default());
        Ok(Self { slots })
    }

    /// Like `new`, halving the request after each failed allocation. Ends
    /// with a disabled table if nothing can be allocated.
    pub fn with_fallback(requested: usize) -> Self {
        let mut size = requested;
        while size >= 2 {
            match Self::new(size) {
                Ok(table) => return table,
                Err(e) => {
                    warn!("{e}; retrying with {} entries", size / 2);
                    size /= 2;
                }
            }
        }
        warn!("running without a transposition table");
        Self::disabled()
    }

    /// A table that stores nothing. Search stays correct, only slower.
    pub fn disabled() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Approximate memory footprint in bytes.
    pub fn size_bytes(&self) -> usize {
        self.slots.len() * std::mem::size_of::<Slot>()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Overwrites whatever occupies the slot of `fp`.
    #[inline]
    pub fn store(&mut self, fp: Fingerprint, entry: TtEntry) {
        if self.slots.is_empty() {
            return;
        }
        let i = self.index(fp.key);
        self.slots[i] = Slot {
            key: fp.key,
            twos: fp.twos,
            threes: fp.threes,
            entry: Some(entry),
        };
    }

    /// The stored entry for `fp`, if its slot holds this exact position.
    #[inline]
    pub fn load(&self, fp: Fingerprint) -> Option<TtEntry> {
        if self.slots.is_empty() {
            return None;
        }
        let slot = &self.slots[self.index(fp.key)];
        if slot.key == fp.key && slot.twos == fp.twos && slot.threes == fp.threes {
            slot.entry
        } else {
            None
        }
    }

    /// Forget every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::default());
    }
}

/// Largest prime `<= n`, or None when `n < 2`.
pub fn prev_prime(n: usize) -> Option<usize> {
    if n < 2 {
        return None;
    }
    if n == 2 {
        return Some(2);
    }
    let mut candidate = if n % 2 == 0 { n - 1 } else { n };
    while candidate > 2 {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate -= 2;
    }
    Some(2)
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
