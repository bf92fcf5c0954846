//! The driving loop.
//!
//! One logical loop per session: each phase either waits on press events or
//! walks a timed choreography, and every wait pumps the press channel so a
//! player can interrupt cosmetics, trigger transitions, or score mid-reveal.
//! The slot map is the single mutual-exclusion domain shared by the reveal
//! timer and the press handler; whichever takes a tile out first wins and the
//! loser sees an empty slot.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::time::{sleep, sleep_until, Instant};

use deck_mole_board::{ButtonDeck, PressEvent};
use deck_mole_core::{scoring, script, GameRng, RoundState, TileBag};
use deck_mole_present::Presenter;
use deck_mole_types::{GamePhase, TileKind};

use crate::config::GameConfig;
use crate::events::{EventSink, GameEvent};
use crate::slots::Slots;

/// The game session state machine.
pub struct GameEngine<D: ButtonDeck, P: Presenter> {
    config: GameConfig,
    deck: Arc<D>,
    presenter: Arc<P>,
    rng: GameRng,
    bag: TileBag,
    state: RoundState,
    slots: Arc<Mutex<Slots>>,
    press_rx: mpsc::UnboundedReceiver<PressEvent>,
    events: EventSink,
}

/// What ended a press-pumping wait.
enum Wake {
    Deadline,
    Press(PressEvent),
    Closed,
}

/// Wait until the deadline or the next press event, whichever comes first.
///
/// Free function on purpose: it borrows only the receiver, so callers can
/// act on the engine in the same loop iteration.
async fn next_wake(press_rx: &mut mpsc::UnboundedReceiver<PressEvent>, deadline: Instant) -> Wake {
    tokio::select! {
        _ = sleep_until(deadline) => Wake::Deadline,
        ev = press_rx.recv() => match ev {
            Some(ev) => Wake::Press(ev),
            None => Wake::Closed,
        },
    }
}

impl<D: ButtonDeck, P: Presenter> GameEngine<D, P> {
    /// Build an engine over a deck and presenter.
    ///
    /// Validates the config against the deck, takes the deck's press stream,
    /// and opens the event log if one is configured. Fatal errors here are
    /// startup errors; nothing is retried.
    pub fn new(config: GameConfig, deck: Arc<D>, presenter: Arc<P>) -> Result<Self> {
        config
            .validate(deck.button_count())
            .context("invalid game configuration")?;

        let press_rx = deck.subscribe()?;

        let mut events = EventSink::new();
        if let Some(path) = &config.event_log {
            events.open_log(path)?;
        }

        let bag = TileBag::with_reveal_range(config.reveal_min_ms, config.reveal_max_ms);
        let rng = GameRng::new(config.seed);

        Ok(Self {
            config,
            deck,
            presenter,
            rng,
            bag,
            state: RoundState::new(),
            slots: Arc::new(Mutex::new(Slots::new())),
            press_rx,
            events,
        })
    }

    /// Attach an observer for the session's event stream.
    pub fn observe(&mut self) -> mpsc::UnboundedReceiver<GameEvent> {
        self.events.attach()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn progress(&self) -> u32 {
        self.state.progress
    }

    /// Run the session until the process is stopped or the deck goes away.
    ///
    /// The state machine has no terminal state; this only returns on error.
    pub async fn run(mut self) -> Result<()> {
        println!(
            "[Engine] session up: {} buttons, seed {}",
            self.deck.button_count(),
            self.config.seed
        );
        self.deck.set_brightness(self.config.brightness)?;
        self.deck.clear_all()?;

        loop {
            let next = match self.state.phase {
                GamePhase::Idle => self.idle_phase().await?,
                GamePhase::Starting => self.starting_phase().await?,
                GamePhase::Active => self.active_phase().await?,
                GamePhase::GameOver => self.game_over_phase().await?,
            };
            self.set_phase(next);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
        println!("[Engine] phase: {}", phase.as_str());
        self.events.emit(GameEvent::PhaseChanged {
            phase: phase.as_str(),
        });
    }

    /// Idle: score and progress are wiped, the attract loop replays until
    /// any button press arms a round.
    async fn idle_phase(&mut self) -> Result<GamePhase> {
        self.state.reset();
        loop {
            if self.play_attract().await? {
                return Ok(GamePhase::Starting);
            }
            if self.wait_for_press(self.config.idle_replay_ms).await? {
                return Ok(GamePhase::Starting);
            }
        }
    }

    /// Play the attract script; true if a press interrupted it.
    async fn play_attract(&mut self) -> Result<bool> {
        for step in script::ATTRACT {
            if let Err(e) = self.presenter.attract_frame(step.cue) {
                eprintln!("[Present] attract frame failed: {}", e);
            }
            if self.wait_for_press(step.hold_ms).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Starting: refill the bag, play ready/set/go. Presses during the
    /// countdown neither score nor transition; they are discarded so they
    /// cannot leak into Active as phantom empty presses.
    async fn starting_phase(&mut self) -> Result<GamePhase> {
        self.deck.clear_all()?;
        self.bag
            .reset(self.config.moles, self.config.decoys, &mut self.rng);
        println!(
            "[Engine] round starting: {} moles, {} decoys",
            self.config.moles, self.config.decoys
        );
        self.events.emit(GameEvent::RoundStarted {
            round_length: self.config.round_length() as u32,
        });

        for step in script::COUNTDOWN {
            if let Err(e) = self.presenter.countdown_stage(step.cue) {
                eprintln!("[Present] countdown stage failed: {}", e);
            }
            self.discard_presses_for(step.hold_ms).await?;
        }
        Ok(GamePhase::Active)
    }

    /// Active: reveal every tile in the bag once, scoring presses as they
    /// race the reveal windows.
    async fn active_phase(&mut self) -> Result<GamePhase> {
        self.deck.clear_all()?;
        if let Err(e) = self.presenter.playfield() {
            eprintln!("[Present] playfield failed: {}", e);
        }
        self.pump_presses_for(self.config.settle_ms).await?;

        let round_length = self.config.round_length() as u32;
        while self.state.progress < round_length {
            let button = self.pick_free_button();
            let tile = self
                .bag
                .draw_random(&mut self.rng)
                .context("tile bag ran dry mid-round")?;

            self.slots
                .lock()
                .unwrap()
                .occupy(button, tile, Instant::now());
            self.events.emit(GameEvent::TileRevealed {
                button,
                kind: tile.kind.as_str(),
                reveal_ms: tile.reveal_ms,
            });
            if let Err(e) = self.presenter.tile_revealed(button, &tile) {
                eprintln!("[Present] tile reveal failed: {}", e);
            }

            // The reveal timer is never cancelled: a press mid-window leaves
            // it to finish and perform a redundant clear below.
            self.pump_presses_for(tile.reveal_ms as u64).await?;

            if let Some(expired) = self.slots.lock().unwrap().take(button) {
                self.state
                    .add_points(scoring::expiry_points(expired.tile.kind));
                self.events.emit(GameEvent::TileExpired {
                    button,
                    kind: expired.tile.kind.as_str(),
                });
                if let Err(e) = self.presenter.tile_cleared(button) {
                    eprintln!("[Present] tile clear failed: {}", e);
                }
            }
            self.deck.clear_button(button)?;

            self.pump_presses_for(self.config.gap_ms).await?;
            self.state.progress += 1;
        }

        println!("[Engine] round over: {} points", self.state.score);
        self.events.emit(GameEvent::RoundEnded {
            score: self.state.score,
        });
        Ok(GamePhase::GameOver)
    }

    /// GameOver: play the summary, then hold until a press returns the
    /// machine to Idle. The score shown is the Active-phase total, verbatim.
    async fn game_over_phase(&mut self) -> Result<GamePhase> {
        let score = self.state.score;
        for step in script::SUMMARY {
            if let Err(e) = self.presenter.summary_frame(step.cue, score) {
                eprintln!("[Present] summary frame failed: {}", e);
            }
            if self.wait_for_press(step.hold_ms).await? {
                return Ok(GamePhase::Idle);
            }
        }
        loop {
            if self.wait_for_press(self.config.idle_replay_ms).await? {
                return Ok(GamePhase::Idle);
            }
        }
    }

    /// Random button that holds no tile at assignment time.
    fn pick_free_button(&mut self) -> u8 {
        let count = self.deck.button_count();
        loop {
            let button = self.rng.pick(count as u32) as u8;
            if !self.slots.lock().unwrap().is_occupied(button) {
                return button;
            }
        }
    }

    /// Does this event arm a phase transition? Only press-downs on buttons
    /// the deck actually has.
    fn is_trigger(&self, ev: &PressEvent) -> bool {
        ev.is_down && ev.button < self.deck.button_count()
    }

    /// Wait up to `ms`, returning true as soon as a triggering press-down
    /// arrives. Non-triggering events are swallowed.
    async fn wait_for_press(&mut self, ms: u64) -> Result<bool> {
        let deadline = Instant::now() + Duration::from_millis(ms);
        loop {
            match next_wake(&mut self.press_rx, deadline).await {
                Wake::Deadline => return Ok(false),
                Wake::Press(ev) => {
                    if self.is_trigger(&ev) {
                        return Ok(true);
                    }
                }
                Wake::Closed => bail!("press event stream closed (deck disconnected)"),
            }
        }
    }

    /// Wait `ms`, dropping every press event on the floor.
    async fn discard_presses_for(&mut self, ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(ms);
        loop {
            match next_wake(&mut self.press_rx, deadline).await {
                Wake::Deadline => return Ok(()),
                Wake::Press(_) => {}
                Wake::Closed => bail!("press event stream closed (deck disconnected)"),
            }
        }
    }

    /// Wait `ms` while resolving presses against the live slot map. This is
    /// every Active-phase suspension: reveal windows, the settle pause, and
    /// inter-tile gaps all keep scoring.
    async fn pump_presses_for(&mut self, ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(ms);
        loop {
            match next_wake(&mut self.press_rx, deadline).await {
                Wake::Deadline => return Ok(()),
                Wake::Press(ev) => self.resolve_press(&ev),
                Wake::Closed => bail!("press event stream closed (deck disconnected)"),
            }
        }
    }

    /// Score one press against the slot map.
    ///
    /// The take is atomic: once a press claims a tile the slot is empty, so
    /// a racing auto-expire (or a second press) resolves as "unoccupied".
    /// Never awaits; strike cosmetics go to a spawned task.
    fn resolve_press(&mut self, ev: &PressEvent) {
        if !ev.is_down {
            return;
        }
        if ev.button >= self.deck.button_count() {
            // Not a button we own: defensive no-op, not an error.
            return;
        }

        let taken = self.slots.lock().unwrap().take(ev.button);
        match taken {
            Some(revealed) => {
                let elapsed_ms = ev
                    .at
                    .saturating_duration_since(revealed.revealed_at)
                    .as_millis() as u32;
                let points = scoring::strike_points(revealed.tile.kind, elapsed_ms);
                self.state.add_points(points);
                println!(
                    "[Engine] {} struck on button {} after {}ms: {:+} points",
                    revealed.tile.kind.as_str(),
                    ev.button,
                    elapsed_ms,
                    points
                );
                self.events.emit(GameEvent::TileStruck {
                    button: ev.button,
                    kind: revealed.tile.kind.as_str(),
                    elapsed_ms,
                    points,
                });
                self.spawn_strike(ev.button, revealed.tile.kind);
            }
            None => {
                let points = scoring::empty_press_points();
                self.state.add_points(points);
                println!(
                    "[Engine] empty press on button {}: {:+} points",
                    ev.button, points
                );
                self.events.emit(GameEvent::EmptyPress {
                    button: ev.button,
                    points,
                });
            }
        }
    }

    /// Run a struck tile's visual script without blocking the driving loop.
    fn spawn_strike(&self, button: u8, kind: TileKind) {
        let presenter = Arc::clone(&self.presenter);
        tokio::spawn(async move {
            for step in script::strike(kind) {
                if let Err(e) = presenter.tile_phase(button, kind, step.cue) {
                    eprintln!("[Present] strike frame failed: {}", e);
                }
                sleep(Duration::from_millis(step.hold_ms)).await;
            }
            if let Err(e) = presenter.tile_cleared(button) {
                eprintln!("[Present] tile clear failed: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_mole_board::SimDeck;
    use deck_mole_core::Tile;
    use deck_mole_present::NullPresenter;

    fn engine() -> GameEngine<SimDeck, NullPresenter> {
        let deck = Arc::new(SimDeck::new(15));
        GameEngine::new(GameConfig::default(), deck, Arc::new(NullPresenter)).unwrap()
    }

    #[tokio::test]
    async fn test_instant_mole_press_scores_full_points() {
        let mut engine = engine();
        let tile = Tile::with_reveal(TileKind::Mole, 1000);
        engine.slots.lock().unwrap().occupy(4, tile, Instant::now());

        engine.resolve_press(&PressEvent::down(4));

        assert_eq!(engine.score(), 1500);
        assert!(engine.slots.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decoy_press_is_flat_penalty() {
        let mut engine = engine();
        let tile = Tile::with_reveal(TileKind::Decoy, 1000);
        engine.slots.lock().unwrap().occupy(9, tile, Instant::now());

        engine.resolve_press(&PressEvent::down(9));

        assert_eq!(engine.score(), -1000);
    }

    #[tokio::test]
    async fn test_empty_button_press_is_penalized() {
        let mut engine = engine();
        engine.resolve_press(&PressEvent::down(2));
        assert_eq!(engine.score(), -1000);
    }

    #[tokio::test]
    async fn test_second_press_on_same_button_hits_empty_slot() {
        let mut engine = engine();
        let tile = Tile::with_reveal(TileKind::Mole, 1000);
        engine.slots.lock().unwrap().occupy(4, tile, Instant::now());

        engine.resolve_press(&PressEvent::down(4));
        engine.resolve_press(&PressEvent::down(4));

        // 1500 for the strike, -1000 for mashing the emptied slot.
        assert_eq!(engine.score(), 500);
    }

    #[tokio::test]
    async fn test_press_up_is_ignored() {
        let mut engine = engine();
        let tile = Tile::with_reveal(TileKind::Mole, 1000);
        engine.slots.lock().unwrap().occupy(4, tile, Instant::now());

        engine.resolve_press(&PressEvent::up(4));

        assert_eq!(engine.score(), 0);
        assert!(engine.slots.lock().unwrap().is_occupied(4));
    }

    #[tokio::test]
    async fn test_out_of_range_press_is_ignored() {
        let mut engine = engine();
        engine.resolve_press(&PressEvent::down(200));
        assert_eq!(engine.score(), 0);
    }

    #[tokio::test]
    async fn test_pick_free_button_skips_occupied_slots() {
        let mut engine = engine();
        // Leave exactly one free button.
        for button in 0..14 {
            engine.slots.lock().unwrap().occupy(
                button,
                Tile::with_reveal(TileKind::Mole, 500),
                Instant::now(),
            );
        }
        assert_eq!(engine.pick_free_button(), 14);
    }

    #[tokio::test]
    async fn test_trigger_requires_down_on_a_real_button() {
        let engine = engine();
        assert!(engine.is_trigger(&PressEvent::down(0)));
        assert!(!engine.is_trigger(&PressEvent::up(0)));
        assert!(!engine.is_trigger(&PressEvent::down(15)));
    }

    #[test]
    fn test_new_rejects_config_that_does_not_fit_the_deck() {
        let deck = Arc::new(SimDeck::new(0));
        let result = GameEngine::new(GameConfig::default(), deck, Arc::new(NullPresenter));
        assert!(result.is_err());
    }
}
