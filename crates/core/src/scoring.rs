//! Scoring rules.
//!
//! Pure functions dispatching on the tile kind; the engine applies them at
//! press-resolution time. All values are per-event deltas, accumulated into
//! the round score by the caller.

use deck_mole_types::{TileKind, DECOY_PENALTY, EMPTY_PRESS_PENALTY, MOLE_POINTS};

/// Points for pressing a tile `elapsed_ms` after its reveal.
///
/// A mole's reward decays linearly with reaction time and may go negative for
/// a very slow press that still lands inside the reveal window. Pressing a
/// decoy is a mistake and costs the flat penalty no matter how fast.
pub fn strike_points(kind: TileKind, elapsed_ms: u32) -> i32 {
    match kind {
        TileKind::Mole => MOLE_POINTS - elapsed_ms as i32,
        TileKind::Decoy => DECOY_PENALTY,
    }
}

/// Points for pressing a button with no occupying tile (never occupied, or
/// already auto-cleared).
pub fn empty_press_points() -> i32 {
    EMPTY_PRESS_PENALTY
}

/// Points for a tile that expires unpressed.
///
/// Letting a decoy expire is free, not rewarded.
pub fn expiry_points(_kind: TileKind) -> i32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_mole_press_is_full_reward() {
        assert_eq!(strike_points(TileKind::Mole, 0), 1500);
    }

    #[test]
    fn test_mole_reward_decays_with_reaction_time() {
        assert_eq!(strike_points(TileKind::Mole, 200), 1300);
        assert_eq!(strike_points(TileKind::Mole, 1499), 1);
    }

    #[test]
    fn test_slow_mole_press_can_go_negative() {
        // A 1500ms-window tile pressed at the last moment.
        assert!(strike_points(TileKind::Mole, 1501) < 0);
    }

    #[test]
    fn test_decoy_press_is_flat_penalty() {
        assert_eq!(strike_points(TileKind::Decoy, 0), -1000);
        assert_eq!(strike_points(TileKind::Decoy, 1400), -1000);
    }

    #[test]
    fn test_empty_press_penalty() {
        assert_eq!(empty_press_points(), -1000);
    }

    #[test]
    fn test_expiry_is_free_for_both_kinds() {
        assert_eq!(expiry_points(TileKind::Mole), 0);
        assert_eq!(expiry_points(TileKind::Decoy), 0);
    }
}
