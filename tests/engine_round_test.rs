//! Full-round engine tests on the paused tokio clock.
//!
//! The in-memory deck plus the observer event stream make rounds fully
//! scripted: the test reacts to reveals the way a player would, and the
//! paused clock fast-forwards every choreography delay deterministically.

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
async fn perfect_round_scores_full_house() {
    let config = GameConfig {
        seed: 7,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    // Any press wakes the idle screen.
    presser.press(0);

    let mut struck = 0;
    let final_score = loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::TileRevealed { button, kind, .. } => {
                // Whack every mole the instant it shows; leave decoys alone.
                if kind == "mole" {
                    presser.press(button);
                }
            }
            GameEvent::TileStruck { points, elapsed_ms, .. } => {
                assert_eq!(elapsed_ms, 0);
                assert_eq!(points, 1500);
                struck += 1;
            }
            GameEvent::EmptyPress { .. } => panic!("no press should miss"),
            GameEvent::RoundEnded { score } => break score,
            _ => {}
        }
    };

    // 7 instant moles, 3 untouched decoys: 7 x 1500 + 3 x 0.
    assert_eq!(struck, 7);
    assert_eq!(final_score, 10500);
    session.abort();
}

#[tokio::test(start_paused = true)]
async fn untouched_round_scores_zero() {
    let config = GameConfig {
        seed: 99,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    let mut revealed_moles = 0;
    let mut revealed_decoys = 0;
    let mut expired = 0;
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::TileRevealed { kind, .. } => match kind {
                "mole" => revealed_moles += 1,
                _ => revealed_decoys += 1,
            },
            GameEvent::TileExpired { .. } => expired += 1,
            GameEvent::TileStruck { .. } | GameEvent::EmptyPress { .. } => {
                panic!("nothing was pressed during the round")
            }
            GameEvent::RoundEnded { score } => {
                // No reward for expired moles, no penalty for expired decoys.
                assert_eq!(score, 0);
                break;
            }
            _ => {}
        }
    }

    // Every tile of the 7+3 bag was revealed exactly once and expired.
    assert_eq!(revealed_moles, 7);
    assert_eq!(revealed_decoys, 3);
    assert_eq!(expired, 10);
    session.abort();
}

#[tokio::test(start_paused = true)]
async fn round_resolves_every_tile_before_game_over() {
    let config = GameConfig {
        seed: 5,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    let mut resolved = 0;
    let mut round_ended = false;
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::TileExpired { .. } => resolved += 1,
            GameEvent::RoundEnded { .. } => round_ended = true,
            GameEvent::PhaseChanged { phase } if phase == "game_over" => break,
            _ => {}
        }
    }

    // GameOver only after all ten tiles ran their windows.
    assert!(round_ended);
    assert_eq!(resolved, 10);
    session.abort();
}

#[tokio::test(start_paused = true)]
async fn custom_round_shape_is_respected() {
    let config = GameConfig {
        moles: 2,
        decoys: 1,
        seed: 13,
        ..GameConfig::default()
    };
    let (presser, mut events, session) = launch(config);

    presser.press(0);

    let mut revealed = 0;
    loop {
        match events.recv().await.expect("event stream ended early") {
            GameEvent::RoundStarted { round_length } => assert_eq!(round_length, 3),
            GameEvent::TileRevealed { .. } => revealed += 1,
            GameEvent::RoundEnded { .. } => break,
            _ => {}
        }
    }
    assert_eq!(revealed, 3);
    session.abort();
}
