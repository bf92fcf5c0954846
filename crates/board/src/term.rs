//! Terminal deck.
//!
//! Draws the button grid in a terminal with crossterm and maps keyboard rows
//! onto button indices, so the game is playable without the real panel.
//! Opening the deck acquires raw mode and the alternate screen; failing to
//! get the terminal is the fatal "device unavailable" case surfaced at
//! startup.
//!
//! Key release events only arrive on terminals that report them; the engine
//! acts on press-down alone, so that is enough everywhere.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    QueueableCommand,
};
use tokio::sync::mpsc;

use deck_mole_types::{ButtonFace, FaceColor, TileKind, VisualPhase};

use crate::{ButtonDeck, PressEvent};

/// Keyboard rows mapped onto button rows, left to right.
const KEY_ROWS: [&str; 3] = ["1234567890", "qwertyuiop", "asdfghjkl;"];

const CELL_W: u16 = 9;
const CELL_H: u16 = 3;

/// Crossterm-backed deck rendering buttons as colored cells.
pub struct TermDeck {
    cols: u8,
    rows: u8,
    out: Mutex<io::Stdout>,
    brightness: Mutex<u8>,
    stop: Arc<AtomicBool>,
    press_rx: Mutex<Option<mpsc::UnboundedReceiver<PressEvent>>>,
    quit_rx: Mutex<Option<mpsc::UnboundedReceiver<()>>>,
}

impl TermDeck {
    /// Open a 5x3 deck (the classic panel layout).
    pub fn open() -> Result<Self> {
        Self::with_geometry(5, 3)
    }

    /// Open a deck with the given grid geometry.
    ///
    /// Acquires raw mode and the alternate screen, and starts the key reader
    /// thread. Errors here are fatal: the terminal is this deck's device.
    pub fn with_geometry(cols: u8, rows: u8) -> Result<Self> {
        if cols == 0 || rows == 0 || cols as usize > KEY_ROWS[0].len() || rows as usize > KEY_ROWS.len()
        {
            return Err(anyhow!("unsupported deck geometry {}x{}", cols, rows));
        }

        terminal::enable_raw_mode()
            .context("failed to open the button deck terminal (exclusive access)")?;

        let mut out = io::stdout();
        out.queue(EnterAlternateScreen)?;
        out.queue(cursor::Hide)?;
        out.queue(Clear(ClearType::All))?;
        out.flush()?;

        let stop = Arc::new(AtomicBool::new(false));
        let (press_tx, press_rx) = mpsc::unbounded_channel();
        let (quit_tx, quit_rx) = mpsc::unbounded_channel();
        spawn_key_reader(cols, rows, Arc::clone(&stop), press_tx, quit_tx);

        let deck = Self {
            cols,
            rows,
            out: Mutex::new(out),
            brightness: Mutex::new(100),
            stop,
            press_rx: Mutex::new(Some(press_rx)),
            quit_rx: Mutex::new(Some(quit_rx)),
        };
        deck.draw_status()?;
        Ok(deck)
    }

    /// Receiver that fires when the operator hits Esc or Ctrl-C.
    pub fn quit_signal(&self) -> Result<mpsc::UnboundedReceiver<()>> {
        self.quit_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow!("quit signal already taken"))
    }

    fn draw_status(&self) -> Result<()> {
        let brightness = *self.brightness.lock().unwrap();
        let mut out = self.out.lock().unwrap();
        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(ResetColor)?;
        out.queue(Print(format!(
            "deck-mole   brightness {:3}%   keys: {} rows   Esc quits",
            brightness, self.rows
        )))?;
        out.flush()?;
        Ok(())
    }

    fn draw_face(&self, index: u8, face: &ButtonFace) -> Result<()> {
        if index >= self.cols * self.rows {
            // Defensive: drawing past the grid is a no-op, same as pressing one.
            return Ok(());
        }
        let col = (index % self.cols) as u16;
        let row = (index / self.cols) as u16;
        let x = col * (CELL_W + 1);
        let y = row * (CELL_H + 1) + 2;

        let (label, fg, bg) = face_style(face);
        let mut out = self.out.lock().unwrap();
        out.queue(SetForegroundColor(fg))?;
        out.queue(SetBackgroundColor(bg))?;
        for line in 0..CELL_H {
            out.queue(cursor::MoveTo(x, y + line))?;
            if line == CELL_H / 2 {
                out.queue(Print(center(&label, CELL_W as usize)))?;
            } else {
                out.queue(Print(" ".repeat(CELL_W as usize)))?;
            }
        }
        out.queue(ResetColor)?;
        out.flush()?;
        Ok(())
    }

    fn close(&self) {
        self.stop.store(true, Ordering::Relaxed);
        // Best-effort restore; the terminal may already be gone.
        if let Ok(mut out) = self.out.lock() {
            let _ = out.queue(ResetColor);
            let _ = out.queue(cursor::Show);
            let _ = out.queue(LeaveAlternateScreen);
            let _ = out.flush();
        }
        let _ = terminal::disable_raw_mode();
    }
}

impl Drop for TermDeck {
    fn drop(&mut self) {
        self.close();
    }
}

impl ButtonDeck for TermDeck {
    fn button_count(&self) -> u8 {
        self.cols * self.rows
    }

    fn set_button(&self, index: u8, face: ButtonFace) -> Result<()> {
        self.draw_face(index, &face)
    }

    fn clear_button(&self, index: u8) -> Result<()> {
        self.draw_face(index, &ButtonFace::Blank)
    }

    fn clear_all(&self) -> Result<()> {
        for index in 0..self.button_count() {
            self.draw_face(index, &ButtonFace::Blank)?;
        }
        Ok(())
    }

    fn set_brightness(&self, percent: u8) -> Result<()> {
        *self.brightness.lock().unwrap() = percent.min(100);
        self.draw_status()
    }

    fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<PressEvent>> {
        self.press_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow!("press events already subscribed"))
    }
}

fn spawn_key_reader(
    cols: u8,
    rows: u8,
    stop: Arc<AtomicBool>,
    press_tx: mpsc::UnboundedSender<PressEvent>,
    quit_tx: mpsc::UnboundedSender<()>,
) {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };

            let quit = key.code == KeyCode::Esc
                || (key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL));
            if quit && key.kind == KeyEventKind::Press {
                let _ = quit_tx.send(());
                continue;
            }

            let KeyCode::Char(c) = key.code else {
                continue;
            };
            let Some(button) = key_to_button(c, cols, rows) else {
                continue;
            };
            match key.kind {
                KeyEventKind::Press => {
                    let _ = press_tx.send(PressEvent::down(button));
                }
                KeyEventKind::Release => {
                    let _ = press_tx.send(PressEvent::up(button));
                }
                // Terminal auto-repeat is not a new press.
                KeyEventKind::Repeat => {}
            }
        }
    });
}

/// Map a keyboard character to a button index for the given geometry.
fn key_to_button(c: char, cols: u8, rows: u8) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    for (row, keys) in KEY_ROWS.iter().take(rows as usize).enumerate() {
        if let Some(col) = keys[..cols as usize].find(c) {
            return Some(row as u8 * cols + col as u8);
        }
    }
    None
}

/// Label and colors used to render a face.
fn face_style(face: &ButtonFace) -> (String, Color, Color) {
    match face {
        ButtonFace::Blank => (String::new(), Color::White, Color::Black),
        ButtonFace::Playfield => (String::new(), Color::White, Color::DarkGreen),
        ButtonFace::Hammer => ("HAMMER".to_string(), Color::Black, Color::Grey),
        ButtonFace::Tile { kind, phase } => match (kind, phase) {
            (TileKind::Mole, VisualPhase::Idle) => ("MOLE".to_string(), Color::Black, Color::Yellow),
            (TileKind::Mole, VisualPhase::Struck) => ("BONK".to_string(), Color::White, Color::Red),
            (TileKind::Mole, VisualPhase::Resolved) => {
                ("OUCH".to_string(), Color::White, Color::DarkRed)
            }
            (TileKind::Decoy, VisualPhase::Idle) => {
                ("HOLE".to_string(), Color::White, Color::DarkGrey)
            }
            (TileKind::Decoy, VisualPhase::Struck) => {
                ("DUNK".to_string(), Color::White, Color::Blue)
            }
            (TileKind::Decoy, VisualPhase::Resolved) => {
                ("HOLE".to_string(), Color::White, Color::DarkGrey)
            }
        },
        ButtonFace::Text { text, fg, bg } => (text.clone(), face_color(*fg), face_color(*bg)),
    }
}

fn face_color(color: FaceColor) -> Color {
    match color {
        FaceColor::White => Color::White,
        FaceColor::Black => Color::Black,
        FaceColor::Red => Color::Red,
        FaceColor::Yellow => Color::Yellow,
        FaceColor::Green => Color::Green,
        FaceColor::DarkGreen => Color::DarkGreen,
        FaceColor::Blue => Color::Blue,
        FaceColor::Purple => Color::Magenta,
        FaceColor::Orange => Color::DarkYellow,
        FaceColor::Transparent => Color::Reset,
    }
}

fn center(label: &str, width: usize) -> String {
    let label: String = label.chars().take(width).collect();
    let pad = width - label.chars().count();
    let left = pad / 2;
    format!(
        "{}{}{}",
        " ".repeat(left),
        label,
        " ".repeat(pad - left)
    )
}
