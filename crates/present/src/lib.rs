//! Presentation layer.
//!
//! The engine never draws anything itself; it hands semantic cues to a
//! [`Presenter`] and moves on. All presenter calls are fire-and-forget
//! cosmetics: the engine logs failures and keeps the round going, and any
//! pacing between cues belongs to the engine's choreography scripts, not to
//! the presenter.

pub mod audio;

use std::sync::{Arc, Mutex};

use anyhow::Result;

use deck_mole_board::ButtonDeck;
use deck_mole_core::{GameRng, Tile};
use deck_mole_types::{
    AttractFrame, ButtonFace, CountdownStage, FaceColor, SummaryFrame, TileKind, VisualPhase,
};

pub use audio::{AudioSink, NullAudio, Sound};

/// Turns engine state into visuals and sounds. The engine calls it, never
/// the reverse.
pub trait Presenter: Send + Sync + 'static {
    /// One frame of the idle attract loop.
    fn attract_frame(&self, frame: AttractFrame) -> Result<()>;

    /// One stage of the ready/set/go countdown.
    fn countdown_stage(&self, stage: CountdownStage) -> Result<()>;

    /// Repaint the playfield background across the whole deck.
    fn playfield(&self) -> Result<()>;

    /// A tile has been revealed on a button.
    fn tile_revealed(&self, button: u8, tile: &Tile) -> Result<()>;

    /// A struck tile has advanced to a visual phase.
    fn tile_phase(&self, button: u8, kind: TileKind, phase: VisualPhase) -> Result<()>;

    /// A button's slot has been cleared; restore its background.
    fn tile_cleared(&self, button: u8) -> Result<()>;

    /// One frame of the game-over summary, carrying the final score.
    fn summary_frame(&self, frame: SummaryFrame, score: i64) -> Result<()>;
}

/// Presenter that draws nothing; for tests and headless runs.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn attract_frame(&self, _frame: AttractFrame) -> Result<()> {
        Ok(())
    }

    fn countdown_stage(&self, _stage: CountdownStage) -> Result<()> {
        Ok(())
    }

    fn playfield(&self) -> Result<()> {
        Ok(())
    }

    fn tile_revealed(&self, _button: u8, _tile: &Tile) -> Result<()> {
        Ok(())
    }

    fn tile_phase(&self, _button: u8, _kind: TileKind, _phase: VisualPhase) -> Result<()> {
        Ok(())
    }

    fn tile_cleared(&self, _button: u8) -> Result<()> {
        Ok(())
    }

    fn summary_frame(&self, _frame: SummaryFrame, _score: i64) -> Result<()> {
        Ok(())
    }
}

/// Presenter that renders onto a [`ButtonDeck`] and fires sound cues.
///
/// Frame positions are derived from the deck's center so the vignette works
/// on any geometry.
pub struct DeckPresenter<D: ButtonDeck> {
    deck: Arc<D>,
    audio: Box<dyn AudioSink>,
    rng: Mutex<GameRng>,
}

impl<D: ButtonDeck> DeckPresenter<D> {
    pub fn new(deck: Arc<D>, audio: Box<dyn AudioSink>, seed: u32) -> Self {
        Self {
            deck,
            audio,
            rng: Mutex::new(GameRng::new(seed)),
        }
    }

    /// Button index at a signed offset from the deck center, wrapping.
    fn at(&self, offset: i32) -> u8 {
        let count = self.deck.button_count() as i32;
        ((count / 2 + offset).rem_euclid(count)) as u8
    }

    fn last(&self) -> u8 {
        self.deck.button_count().saturating_sub(1)
    }

    fn yelp(&self) -> Sound {
        Sound::random_yelp(&mut self.rng.lock().unwrap())
    }

    fn tile_face(kind: TileKind, phase: VisualPhase) -> ButtonFace {
        ButtonFace::Tile { kind, phase }
    }
}

impl<D: ButtonDeck> Presenter for DeckPresenter<D> {
    fn attract_frame(&self, frame: AttractFrame) -> Result<()> {
        match frame {
            AttractFrame::Playfield => self.playfield()?,
            AttractFrame::Hammer => {
                self.audio.play(Sound::Dunk);
                self.deck.set_button(self.at(-1), ButtonFace::Hammer)?;
            }
            AttractFrame::Title => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.at(0),
                    ButtonFace::text("WHACK", FaceColor::DarkGreen, FaceColor::Transparent),
                )?;
            }
            AttractFrame::Burrow => {
                self.audio.play(Sound::Bop);
                self.deck
                    .set_button(self.at(1), Self::tile_face(TileKind::Decoy, VisualPhase::Idle))?;
            }
            AttractFrame::Peek => {
                self.audio.play(Sound::Dat);
                self.deck
                    .set_button(self.at(1), Self::tile_face(TileKind::Mole, VisualPhase::Idle))?;
            }
            AttractFrame::Wallop => {
                self.audio.play(Sound::Dunk);
                self.deck.set_button(
                    self.at(1),
                    Self::tile_face(TileKind::Mole, VisualPhase::Struck),
                )?;
            }
            AttractFrame::Bonked => {
                self.audio.play(self.yelp());
                self.deck.set_button(
                    self.at(1),
                    Self::tile_face(TileKind::Mole, VisualPhase::Resolved),
                )?;
            }
            AttractFrame::StartPrompt => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.last(),
                    ButtonFace::text("START", FaceColor::White, FaceColor::Purple),
                )?;
            }
        }
        Ok(())
    }

    fn countdown_stage(&self, stage: CountdownStage) -> Result<()> {
        let (sound, face) = match stage {
            CountdownStage::Ready => (
                Sound::Ready,
                ButtonFace::text("READY", FaceColor::White, FaceColor::Red),
            ),
            CountdownStage::Set => (
                Sound::Set,
                ButtonFace::text("SET", FaceColor::Black, FaceColor::Yellow),
            ),
            CountdownStage::Go => (
                Sound::Go,
                ButtonFace::text("GO!", FaceColor::White, FaceColor::Green),
            ),
        };
        self.audio.play(sound);
        self.deck.set_button(self.at(0), face)
    }

    fn playfield(&self) -> Result<()> {
        for button in 0..self.deck.button_count() {
            self.deck.set_button(button, ButtonFace::Playfield)?;
        }
        Ok(())
    }

    fn tile_revealed(&self, button: u8, tile: &Tile) -> Result<()> {
        self.deck
            .set_button(button, Self::tile_face(tile.kind, VisualPhase::Idle))
    }

    fn tile_phase(&self, button: u8, kind: TileKind, phase: VisualPhase) -> Result<()> {
        match (kind, phase) {
            (TileKind::Mole, VisualPhase::Struck) | (TileKind::Decoy, VisualPhase::Struck) => {
                self.audio.play(Sound::Dunk)
            }
            (TileKind::Mole, VisualPhase::Resolved) => self.audio.play(self.yelp()),
            _ => {}
        }
        self.deck.set_button(button, Self::tile_face(kind, phase))
    }

    fn tile_cleared(&self, button: u8) -> Result<()> {
        self.deck.set_button(button, ButtonFace::Playfield)
    }

    fn summary_frame(&self, frame: SummaryFrame, score: i64) -> Result<()> {
        match frame {
            SummaryFrame::Playfield => {
                self.audio.play(Sound::GameOver);
                self.playfield()?;
            }
            SummaryFrame::GameOverSign => {
                self.deck.set_button(
                    self.at(-5),
                    ButtonFace::text("GAME OVER", FaceColor::Red, FaceColor::Black),
                )?;
            }
            SummaryFrame::You => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.at(-2),
                    ButtonFace::text("YOU", FaceColor::White, FaceColor::Transparent),
                )?;
            }
            SummaryFrame::Scored => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.at(-1),
                    ButtonFace::text("SCORED", FaceColor::White, FaceColor::Transparent),
                )?;
            }
            SummaryFrame::Score => {
                self.audio.play(Sound::Bop);
                self.deck.set_button(
                    self.at(0),
                    ButtonFace::text(score.to_string(), FaceColor::Orange, FaceColor::Transparent),
                )?;
            }
            SummaryFrame::Points => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.at(1),
                    ButtonFace::text("POINTS", FaceColor::White, FaceColor::Transparent),
                )?;
            }
            SummaryFrame::Cheer => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.at(2),
                    ButtonFace::text("!!", FaceColor::White, FaceColor::Transparent),
                )?;
            }
            SummaryFrame::AgainPrompt => {
                self.audio.play(Sound::Dat);
                self.deck.set_button(
                    self.last(),
                    ButtonFace::text("AGAIN", FaceColor::White, FaceColor::Blue),
                )?;
            }
        }
        Ok(())
    }
}
