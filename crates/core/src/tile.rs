//! Tile construction.

use deck_mole_types::TileKind;

use crate::rng::GameRng;

/// A target entity occupying one button for one reveal window.
///
/// Tiles are created when drawn from the bag and discarded when their slot is
/// cleared; only the engine touches one in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    /// How long this tile stays pressable, randomized per instance.
    pub reveal_ms: u32,
}

impl Tile {
    /// Construct a tile with a reveal window rolled from `[lo, hi)`.
    pub fn random(kind: TileKind, lo: u32, hi: u32, rng: &mut GameRng) -> Self {
        Self {
            kind,
            reveal_ms: rng.between(lo, hi),
        }
    }

    /// Construct a tile with a fixed reveal window (tests mostly).
    pub fn with_reveal(kind: TileKind, reveal_ms: u32) -> Self {
        Self { kind, reveal_ms }
    }

    /// The flat point value of this tile's kind, before any reaction-time
    /// adjustment.
    pub fn base_points(&self) -> i32 {
        match self.kind {
            TileKind::Mole => deck_mole_types::MOLE_POINTS,
            TileKind::Decoy => deck_mole_types::DECOY_PENALTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_tile_duration_in_range() {
        let mut rng = GameRng::new(11);
        for _ in 0..200 {
            let tile = Tile::random(TileKind::Mole, 500, 1500, &mut rng);
            assert!((500..1500).contains(&tile.reveal_ms));
        }
    }

    #[test]
    fn test_base_points() {
        assert_eq!(Tile::with_reveal(TileKind::Mole, 700).base_points(), 1500);
        assert_eq!(Tile::with_reveal(TileKind::Decoy, 700).base_points(), -1000);
    }
}
