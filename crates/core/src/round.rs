//! Round bookkeeping.

use deck_mole_types::GamePhase;

/// Phase, progress and score for the current session.
///
/// Owned exclusively by the engine. Entering `Idle` resets everything, so a
/// new round never sees the previous round's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub phase: GamePhase,
    /// Tiles resolved so far this round, pressed or expired.
    pub progress: u32,
    pub score: i64,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Idle,
            progress: 0,
            score: 0,
        }
    }

    /// Reset score and progress for a fresh session (entry into Idle).
    pub fn reset(&mut self) {
        self.progress = 0;
        self.score = 0;
    }

    /// Apply a scoring delta.
    pub fn add_points(&mut self, points: i32) {
        self.score += points as i64;
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
