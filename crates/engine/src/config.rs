//! Engine configuration.

use std::env;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use deck_mole_types::{
    BAG_CAPACITY, DEFAULT_DECOYS, DEFAULT_MOLES, IDLE_REPLAY_MS, REVEAL_MAX_MS, REVEAL_MIN_MS,
    SETTLE_MS, TILE_GAP_MS,
};

/// Tuning knobs for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Mole tiles per round.
    pub moles: usize,
    /// Decoy tiles per round.
    pub decoys: usize,
    /// Reveal window range `[min, max)` in milliseconds.
    pub reveal_min_ms: u32,
    pub reveal_max_ms: u32,
    /// Pause after the playfield comes up, before the first tile.
    pub settle_ms: u64,
    /// Pause between tiles.
    pub gap_ms: u64,
    /// How long the idle screen holds before the attract loop replays.
    pub idle_replay_ms: u64,
    /// Panel brightness in percent.
    pub brightness: u8,
    /// RNG seed; fix it for a reproducible round.
    pub seed: u32,
    /// Optional JSONL event log path.
    pub event_log: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            moles: DEFAULT_MOLES,
            decoys: DEFAULT_DECOYS,
            reveal_min_ms: REVEAL_MIN_MS,
            reveal_max_ms: REVEAL_MAX_MS,
            settle_ms: SETTLE_MS,
            gap_ms: TILE_GAP_MS,
            idle_replay_ms: IDLE_REPLAY_MS,
            brightness: 100,
            seed: 1,
            event_log: None,
        }
    }
}

impl GameConfig {
    /// Build a config from `DECK_MOLE_*` environment variables, falling back
    /// to defaults. The seed comes from the clock unless `DECK_MOLE_SEED`
    /// pins it; determinism is opt-in.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = env_parse("DECK_MOLE_SEED").unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or(1)
        });

        let event_log = env::var("DECK_MOLE_EVENT_LOG")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            moles: env_parse("DECK_MOLE_MOLES").unwrap_or(defaults.moles),
            decoys: env_parse("DECK_MOLE_DECOYS").unwrap_or(defaults.decoys),
            reveal_min_ms: env_parse("DECK_MOLE_REVEAL_MIN_MS").unwrap_or(defaults.reveal_min_ms),
            reveal_max_ms: env_parse("DECK_MOLE_REVEAL_MAX_MS").unwrap_or(defaults.reveal_max_ms),
            settle_ms: env_parse("DECK_MOLE_SETTLE_MS").unwrap_or(defaults.settle_ms),
            gap_ms: env_parse("DECK_MOLE_GAP_MS").unwrap_or(defaults.gap_ms),
            idle_replay_ms: env_parse("DECK_MOLE_IDLE_REPLAY_MS").unwrap_or(defaults.idle_replay_ms),
            brightness: env_parse::<u8>("DECK_MOLE_BRIGHTNESS")
                .unwrap_or(defaults.brightness)
                .min(100),
            seed,
            event_log,
        }
    }

    /// Tiles played per round.
    pub fn round_length(&self) -> usize {
        self.moles + self.decoys
    }

    /// Check the config against the deck it will drive.
    pub fn validate(&self, button_count: u8) -> Result<(), ConfigError> {
        if self.round_length() == 0 {
            return Err(ConfigError::EmptyRound);
        }
        if self.round_length() > BAG_CAPACITY {
            return Err(ConfigError::BagOverflow {
                tiles: self.round_length(),
            });
        }
        if button_count == 0 {
            return Err(ConfigError::NoButtons);
        }
        if self.reveal_min_ms >= self.reveal_max_ms {
            return Err(ConfigError::BadRevealRange {
                min: self.reveal_min_ms,
                max: self.reveal_max_ms,
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Rejected configuration, reported to the operator at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyRound,
    BagOverflow { tiles: usize },
    NoButtons,
    BadRevealRange { min: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyRound => write!(f, "round has zero tiles"),
            ConfigError::BagOverflow { tiles } => {
                write!(f, "round of {} tiles exceeds bag capacity {}", tiles, BAG_CAPACITY)
            }
            ConfigError::NoButtons => write!(f, "deck reports zero buttons"),
            ConfigError::BadRevealRange { min, max } => {
                write!(f, "reveal range [{}, {}) is empty", min, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
