//! Core types shared across the application.
//! This crate contains pure data types with no external dependencies.

/// Default round composition.
pub const DEFAULT_MOLES: usize = 7;
pub const DEFAULT_DECOYS: usize = 3;

/// Scoring constants.
///
/// A mole rewards a timely press; the reward decays by one point per
/// millisecond of reaction time. A decoy punishes any press with a flat
/// penalty, as does pressing a button that holds no tile at all.
pub const MOLE_POINTS: i32 = 1500;
pub const DECOY_PENALTY: i32 = -1000;
pub const EMPTY_PRESS_PENALTY: i32 = -1000;

/// Reveal window bounds (milliseconds). Each tile gets an independently
/// randomized duration in `[REVEAL_MIN_MS, REVEAL_MAX_MS)`.
pub const REVEAL_MIN_MS: u32 = 500;
pub const REVEAL_MAX_MS: u32 = 1500;

/// Pacing constants (milliseconds).
pub const SETTLE_MS: u64 = 1000;
pub const TILE_GAP_MS: u64 = 500;
pub const IDLE_REPLAY_MS: u64 = 5000;

/// Upper bound on tiles per round; the bag storage is sized to this.
pub const BAG_CAPACITY: usize = 32;

/// Kind of a revealed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Press it before the window closes.
    Mole,
    /// Leave it alone; pressing it costs points.
    Decoy,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Mole => "mole",
            TileKind::Decoy => "decoy",
        }
    }

    /// Parse a tile kind from a string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mole" => Some(TileKind::Mole),
            "decoy" => Some(TileKind::Decoy),
            _ => None,
        }
    }
}

/// Visual state of a tile while it occupies a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualPhase {
    /// Resting face shown on reveal.
    Idle,
    /// The instant of the hit (hammer down).
    Struck,
    /// Aftermath face before the slot is cleared.
    Resolved,
}

/// Session phase. Initial state is `Idle`; there is no terminal state, the
/// machine cycles until the process is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Idle,
    Starting,
    Active,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Starting => "starting",
            GamePhase::Active => "active",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Small palette for text faces. Concrete decks map these to whatever color
/// space they have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceColor {
    White,
    Black,
    Red,
    Yellow,
    Green,
    DarkGreen,
    Blue,
    Purple,
    Orange,
    Transparent,
}

/// What a button should display. Rendering the face is the deck's concern;
/// the engine and presenter only pick descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonFace {
    /// Button off / background only.
    Blank,
    /// The playfield background crop for this button.
    Playfield,
    /// A tile in a given visual phase.
    Tile { kind: TileKind, phase: VisualPhase },
    /// The hammer graphic used by the attract loop.
    Hammer,
    /// A text label with colors.
    Text {
        text: String,
        fg: FaceColor,
        bg: FaceColor,
    },
}

impl ButtonFace {
    /// Convenience constructor for text faces.
    pub fn text(text: impl Into<String>, fg: FaceColor, bg: FaceColor) -> Self {
        ButtonFace::Text {
            text: text.into(),
            fg,
            bg,
        }
    }
}

/// Frames of the idle attract loop, in playback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttractFrame {
    /// Repaint the whole playfield.
    Playfield,
    /// Hammer graphic appears.
    Hammer,
    /// Title card.
    Title,
    /// An empty burrow opens up.
    Burrow,
    /// A mole peeks out of the burrow.
    Peek,
    /// The hammer comes down on it.
    Wallop,
    /// The mole wears the consequences.
    Bonked,
    /// "START" prompt.
    StartPrompt,
}

/// Countdown stages played while a round is starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStage {
    Ready,
    Set,
    Go,
}

/// Frames of the game-over summary, in playback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFrame {
    Playfield,
    GameOverSign,
    You,
    Scored,
    /// The final score figure.
    Score,
    Points,
    Cheer,
    /// "AGAIN" prompt.
    AgainPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_kind_round_trip() {
        for kind in [TileKind::Mole, TileKind::Decoy] {
            assert_eq!(TileKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TileKind::from_str("MOLE"), Some(TileKind::Mole));
        assert_eq!(TileKind::from_str("hamster"), None);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(GamePhase::Idle.as_str(), "idle");
        assert_eq!(GamePhase::GameOver.as_str(), "game_over");
    }

    #[test]
    fn test_text_face_constructor() {
        let face = ButtonFace::text("GO!", FaceColor::White, FaceColor::Green);
        assert_eq!(
            face,
            ButtonFace::Text {
                text: "GO!".to_string(),
                fg: FaceColor::White,
                bg: FaceColor::Green,
            }
        );
    }
}
