//! In-memory deck.
//!
//! Records every command it receives and exposes a presser handle for
//! injecting button events, which is all the integration tests and the
//! headless demo need.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

use deck_mole_types::ButtonFace;

use crate::{ButtonDeck, PressEvent};

/// One recorded deck command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckCommand {
    Set(u8, ButtonFace),
    Clear(u8),
    ClearAll,
    Brightness(u8),
}

/// Deck double: applies commands to an in-memory face map and logs them.
pub struct SimDeck {
    buttons: u8,
    faces: Mutex<HashMap<u8, ButtonFace>>,
    log: Mutex<Vec<DeckCommand>>,
    press_tx: mpsc::UnboundedSender<PressEvent>,
    press_rx: Mutex<Option<mpsc::UnboundedReceiver<PressEvent>>>,
}

impl SimDeck {
    pub fn new(buttons: u8) -> Self {
        let (press_tx, press_rx) = mpsc::unbounded_channel();
        Self {
            buttons,
            faces: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
            press_tx,
            press_rx: Mutex::new(Some(press_rx)),
        }
    }

    /// Handle for injecting press events into this deck.
    pub fn presser(&self) -> SimPresser {
        SimPresser {
            tx: self.press_tx.clone(),
        }
    }

    /// Face currently shown on a button, if any.
    pub fn face(&self, button: u8) -> Option<ButtonFace> {
        self.faces.lock().unwrap().get(&button).cloned()
    }

    /// Snapshot of every command received so far, in order.
    pub fn commands(&self) -> Vec<DeckCommand> {
        self.log.lock().unwrap().clone()
    }
}

impl ButtonDeck for SimDeck {
    fn button_count(&self) -> u8 {
        self.buttons
    }

    fn set_button(&self, index: u8, face: ButtonFace) -> Result<()> {
        self.faces.lock().unwrap().insert(index, face.clone());
        self.log.lock().unwrap().push(DeckCommand::Set(index, face));
        Ok(())
    }

    fn clear_button(&self, index: u8) -> Result<()> {
        self.faces.lock().unwrap().remove(&index);
        self.log.lock().unwrap().push(DeckCommand::Clear(index));
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        self.faces.lock().unwrap().clear();
        self.log.lock().unwrap().push(DeckCommand::ClearAll);
        Ok(())
    }

    fn set_brightness(&self, percent: u8) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(DeckCommand::Brightness(percent));
        Ok(())
    }

    fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<PressEvent>> {
        self.press_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow!("press events already subscribed"))
    }
}

/// Cloneable handle that feeds press events into a [`SimDeck`].
#[derive(Clone)]
pub struct SimPresser {
    tx: mpsc::UnboundedSender<PressEvent>,
}

impl SimPresser {
    /// A full tap: press-down followed by press-up.
    pub fn press(&self, button: u8) {
        self.press_down(button);
        self.press_up(button);
    }

    pub fn press_down(&self, button: u8) {
        let _ = self.tx.send(PressEvent::down(button));
    }

    pub fn press_up(&self, button: u8) {
        let _ = self.tx.send(PressEvent::up(button));
    }

    /// Deliver an arbitrary event (out-of-range indices included).
    pub fn send(&self, event: PressEvent) {
        let _ = self.tx.send(event);
    }
}
