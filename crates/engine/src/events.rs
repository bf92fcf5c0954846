//! Observable game events.
//!
//! The engine narrates the session as a stream of serializable records:
//! an optional in-process channel (what the integration tests watch) and an
//! optional JSONL file for offline inspection. Both are best-effort — a full
//! or missing consumer never stalls the game.

use std::fs::{File, OpenOptions};
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::mpsc;

/// One thing that happened during a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged {
        phase: &'static str,
    },
    RoundStarted {
        round_length: u32,
    },
    TileRevealed {
        button: u8,
        kind: &'static str,
        reveal_ms: u32,
    },
    TileStruck {
        button: u8,
        kind: &'static str,
        elapsed_ms: u32,
        points: i32,
    },
    TileExpired {
        button: u8,
        kind: &'static str,
    },
    EmptyPress {
        button: u8,
        points: i32,
    },
    RoundEnded {
        score: i64,
    },
}

/// Fan-out for game events.
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<GameEvent>>,
    log: Option<EventLog>,
}

impl EventSink {
    pub fn new() -> Self {
        Self { tx: None, log: None }
    }

    /// Attach an observer channel, replacing any previous one.
    pub fn attach(&mut self) -> mpsc::UnboundedReceiver<GameEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }

    /// Start appending events to a JSONL file.
    pub fn open_log(&mut self, path: &str) -> Result<()> {
        self.log = Some(EventLog::open(path)?);
        Ok(())
    }

    pub fn emit(&mut self, event: GameEvent) {
        if let Some(tx) = &self.tx {
            // A dropped observer is fine; the game does not care.
            let _ = tx.send(event);
        }
        if let Some(log) = &mut self.log {
            if let Err(e) = log.write(&event) {
                eprintln!("[Engine] event log write failed, disabling: {}", e);
                self.log = None;
            }
        }
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only JSON-lines event log.
pub struct EventLog {
    file: File,
}

impl EventLog {
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open event log at {}", path))?;
        Ok(Self { file })
    }

    pub fn write(&mut self, event: &GameEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = GameEvent::TileStruck {
            button: 4,
            kind: "mole",
            elapsed_ms: 120,
            points: 1380,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"tile_struck\""));
        assert!(json.contains("\"kind\":\"mole\""));
        assert!(json.contains("\"points\":1380"));
    }

    #[tokio::test]
    async fn test_sink_forwards_to_observer() {
        let mut sink = EventSink::new();
        let mut rx = sink.attach();
        sink.emit(GameEvent::RoundEnded { score: 10500 });
        assert_eq!(rx.recv().await, Some(GameEvent::RoundEnded { score: 10500 }));
    }

    #[test]
    fn test_emit_without_observer_is_a_no_op() {
        let mut sink = EventSink::new();
        sink.emit(GameEvent::EmptyPress {
            button: 0,
            points: -1000,
        });
    }
}
