//! Button deck abstraction.
//!
//! The engine never talks to hardware directly; it drives a [`ButtonDeck`]:
//! a grid of individually addressable buttons that can each display a face
//! and report presses. Two implementations live here:
//!
//! - [`SimDeck`]: in-memory deck that records every command and lets a test
//!   (or the headless demo) inject presses.
//! - [`TermDeck`]: a terminal stand-in drawn with crossterm, with keyboard
//!   rows mapped to buttons.

pub mod sim;
pub mod term;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::Instant;

use deck_mole_types::ButtonFace;

pub use sim::{DeckCommand, SimDeck, SimPresser};
pub use term::TermDeck;

/// A button press or release, as delivered by a deck.
///
/// Events for the same button preserve down-before-up ordering; ordering
/// across different buttons is not guaranteed. Consumed exactly once by the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    pub button: u8,
    pub is_down: bool,
    pub at: Instant,
}

impl PressEvent {
    pub fn down(button: u8) -> Self {
        Self {
            button,
            is_down: true,
            at: Instant::now(),
        }
    }

    pub fn up(button: u8) -> Self {
        Self {
            button,
            is_down: false,
            at: Instant::now(),
        }
    }
}

/// A grid of illuminable input/output buttons.
///
/// Command methods take `&self`; implementations use interior mutability so
/// one deck can be shared between the engine and the presenter.
pub trait ButtonDeck: Send + Sync + 'static {
    /// Number of addressable buttons. Indices run `0..button_count()`.
    fn button_count(&self) -> u8;

    /// Display a face on one button.
    fn set_button(&self, index: u8, face: ButtonFace) -> Result<()>;

    /// Return one button to its inert state.
    fn clear_button(&self, index: u8) -> Result<()>;

    /// Return every button to its inert state.
    fn clear_all(&self) -> Result<()>;

    /// Set global panel brightness in percent.
    fn set_brightness(&self, percent: u8) -> Result<()>;

    /// Take the press-event stream. Single consumer: the first call returns
    /// the receiver, later calls fail.
    fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<PressEvent>>;
}
