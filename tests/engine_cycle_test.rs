//! Session lifecycle tests: Idle -> Starting -> Active -> GameOver -> Idle
//! is a closed cycle and a new round never inherits the previous score.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use deck_mole::board::{SimDeck, SimPresser};
use deck_mole::engine::{GameConfig, GameEngine, GameEvent};
use deck_mole::present::NullPresenter;

fn launch(
    config: GameConfig,
) -> (
    SimPresser,
    UnboundedReceiver<GameEvent>,
    JoinHandle<anyhow::Result<()>>,
) {
    let deck = Arc::new(SimDeck::new(15));
    let presser = deck.presser();
    let mut engine = GameEngine::new(config, deck, Arc::new(NullPresenter)).unwrap();
    let events = engine.observe();
    let session = tokio::spawn(engine.run());
    (presser, events, session)
}

#[tokio::test(start_paused = true)]
async fn phases_advance_in_order() {
    let config = GameConfig {
        seed: 3,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    let mut phases = Vec::new();
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::PhaseChanged { phase } => {
                phases.push(phase);
                if phase == "game_over" {
                    break;
                }
            }
            _ => {}
        }
    }
    assert_eq!(phases, vec!["starting", "active", "game_over"]);
    session.abort();
}

#[tokio::test(start_paused = true)]
async fn game_over_press_returns_to_idle_and_resets_the_score() {
    let config = GameConfig {
        seed: 17,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    // Round 1: whack exactly one mole so the score is nonzero.
    let mut whacked = false;
    let first_score = loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::TileRevealed { button, kind, .. } if kind == "mole" && !whacked => {
                whacked = true;
                presser.press(button);
            }
            GameEvent::RoundEnded { score } => break score,
            _ => {}
        }
    };
    assert_eq!(first_score, 1500);

    // A press during the summary takes the machine back to Idle.
    presser.press(3);
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::PhaseChanged { phase } if phase == "idle" => break,
            _ => {}
        }
    }

    // Arm round 2 and let every tile expire.
    presser.press(5);
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::RoundStarted { round_length } => {
                assert_eq!(round_length, 10);
                break;
            }
            _ => {}
        }
    }

    let second_score = loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::TileStruck { .. } | GameEvent::EmptyPress { .. } => {
                panic!("round 2 had no presses")
            }
            GameEvent::RoundEnded { score } => break score,
            _ => {}
        }
    };

    // Round 1's 1500 points did not leak into round 2.
    assert_eq!(second_score, 0);
    session.abort();
}

#[tokio::test(start_paused = true)]
async fn presses_during_the_countdown_do_not_score() {
    let config = GameConfig {
        seed: 23,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    // Mash buttons the moment the round starts counting down.
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::RoundStarted { .. } => break,
            _ => {}
        }
    }
    for button in 0..5 {
        presser.press(button);
    }

    // The countdown discards those presses; the first scoring event of the
    // round must come from the tiles, not from phantom empty presses.
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::EmptyPress { .. } => {
                panic!("countdown presses must not score as empty presses")
            }
            GameEvent::TileRevealed { .. } => break,
            _ => {}
        }
    }
    session.abort();
}
