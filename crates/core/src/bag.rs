//! Round tile bag.
//!
//! One round draws every tile exactly once: the bag is filled at round start
//! with the configured mix and drained by uniform random removal without
//! replacement. Drawing from an empty bag means the caller's round-length
//! bookkeeping is broken, which is a fatal contract violation rather than a
//! recoverable condition.

use std::fmt;

use arrayvec::ArrayVec;
use deck_mole_types::{TileKind, BAG_CAPACITY};

use crate::rng::GameRng;
use crate::tile::Tile;

/// Error for a draw against an empty bag.
///
/// Indicates a round-length / bag-size mismatch in the state machine; correct
/// operation never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyBag;

impl fmt::Display for EmptyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile bag is empty: draw count exceeded round length")
    }
}

impl std::error::Error for EmptyBag {}

/// The not-yet-drawn tiles for the current round.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: ArrayVec<Tile, BAG_CAPACITY>,
    reveal_lo: u32,
    reveal_hi: u32,
}

impl TileBag {
    /// Create an empty bag rolling reveal windows from the default range.
    pub fn new() -> Self {
        Self::with_reveal_range(deck_mole_types::REVEAL_MIN_MS, deck_mole_types::REVEAL_MAX_MS)
    }

    /// Create an empty bag with a custom reveal range `[lo, hi)`.
    pub fn with_reveal_range(lo: u32, hi: u32) -> Self {
        Self {
            tiles: ArrayVec::new(),
            reveal_lo: lo,
            reveal_hi: hi,
        }
    }

    /// Clear and refill with `moles` mole tiles and `decoys` decoy tiles,
    /// each with an independently randomized reveal window.
    ///
    /// Called exactly once per round, before any draw. `moles + decoys` must
    /// fit [`BAG_CAPACITY`]; config validation enforces that upstream.
    pub fn reset(&mut self, moles: usize, decoys: usize, rng: &mut GameRng) {
        self.tiles.clear();
        for _ in 0..moles {
            self.tiles
                .push(Tile::random(TileKind::Mole, self.reveal_lo, self.reveal_hi, rng));
        }
        for _ in 0..decoys {
            self.tiles
                .push(Tile::random(TileKind::Decoy, self.reveal_lo, self.reveal_hi, rng));
        }
    }

    /// Remove and return a uniformly random remaining tile.
    pub fn draw_random(&mut self, rng: &mut GameRng) -> Result<Tile, EmptyBag> {
        if self.tiles.is_empty() {
            return Err(EmptyBag);
        }
        let i = rng.pick(self.tiles.len() as u32) as usize;
        Ok(self.tiles.swap_remove(i))
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for TileBag {
    fn default() -> Self {
        Self::new()
    }
}
