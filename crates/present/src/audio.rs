//! Sound cues.
//!
//! Audio is fire-and-forget and keyed by asset name; mixing and decoding are
//! someone else's problem. The default sink swallows cues so the game runs
//! silently anywhere.

use deck_mole_core::GameRng;

/// A named sound cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Dat,
    Bop,
    Dunk,
    /// One of the numbered yelp samples, `1..=6`.
    Yelp(u8),
    Ready,
    Set,
    Go,
    GameOver,
}

impl Sound {
    /// Asset path for this cue.
    pub fn asset(&self) -> String {
        match self {
            Sound::Dat => "sounds/dat.wav".to_string(),
            Sound::Bop => "sounds/bop.wav".to_string(),
            Sound::Dunk => "sounds/dunk.wav".to_string(),
            Sound::Yelp(n) => format!("sounds/au{:02}.wav", n),
            Sound::Ready => "sounds/ready.wav".to_string(),
            Sound::Set => "sounds/set.wav".to_string(),
            Sound::Go => "sounds/go.wav".to_string(),
            Sound::GameOver => "sounds/gameover.wav".to_string(),
        }
    }

    /// A randomly chosen yelp.
    pub fn random_yelp(rng: &mut GameRng) -> Sound {
        Sound::Yelp(1 + rng.pick(6) as u8)
    }
}

/// Something that can play a cue. Playback must not block the caller.
pub trait AudioSink: Send + Sync {
    fn play(&self, sound: Sound);
}

/// Sink that plays nothing.
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _sound: Sound) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        assert_eq!(Sound::Dat.asset(), "sounds/dat.wav");
        assert_eq!(Sound::Yelp(3).asset(), "sounds/au03.wav");
        assert_eq!(Sound::GameOver.asset(), "sounds/gameover.wav");
    }

    #[test]
    fn test_random_yelp_in_range() {
        let mut rng = GameRng::new(8);
        for _ in 0..100 {
            let Sound::Yelp(n) = Sound::random_yelp(&mut rng) else {
                panic!("expected a yelp");
            };
            assert!((1..=6).contains(&n));
        }
    }
}
