//! Button-deck whack-a-mole runner (default binary).
//!
//! By default the game runs on a terminal deck: the button grid is drawn
//! with crossterm and the keyboard rows 1-5 / q-t / a-g stand in for the
//! panel. `deck-mole sim` instead plays one headless round on the in-memory
//! deck with a bot pressing every mole, which is handy for smoke-testing a
//! setup with no terminal tricks at all.

use std::sync::Arc;

use anyhow::{Context, Result};

use deck_mole::board::{SimDeck, TermDeck};
use deck_mole::engine::{GameConfig, GameEngine, GameEvent};
use deck_mole::present::{DeckPresenter, NullAudio};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GameConfig::from_env();

    match args.first().map(String::as_str) {
        Some("sim") => run_sim(config).await,
        Some(other) => anyhow::bail!("unknown argument: {} (try: deck-mole [sim])", other),
        None => run_terminal(config).await,
    }
}

/// Run on the terminal deck until the operator quits (Esc or Ctrl-C).
async fn run_terminal(config: GameConfig) -> Result<()> {
    let deck = Arc::new(TermDeck::open().context("could not open the button deck")?);
    let mut quit = deck.quit_signal()?;
    let presenter = Arc::new(DeckPresenter::new(
        Arc::clone(&deck),
        Box::new(NullAudio),
        config.seed,
    ));
    let engine = GameEngine::new(config, Arc::clone(&deck), presenter)?;

    tokio::select! {
        result = engine.run() => result,
        _ = quit.recv() => Ok(()),
        _ = tokio::signal::ctrl_c() => Ok(()),
    }
}

/// Play one self-playing round headlessly and print the event stream.
async fn run_sim(config: GameConfig) -> Result<()> {
    println!("[Sim] headless round on the in-memory deck");

    let deck = Arc::new(SimDeck::new(15));
    let presser = deck.presser();
    let presenter = Arc::new(DeckPresenter::new(
        Arc::clone(&deck),
        Box::new(NullAudio),
        config.seed,
    ));
    let mut engine = GameEngine::new(config, Arc::clone(&deck), presenter)?;
    let mut events = engine.observe();
    let session = tokio::spawn(engine.run());

    // Wake the attract loop, then let the bot whack every mole on reveal.
    presser.press(0);

    while let Some(event) = events.recv().await {
        println!("[Sim] {:?}", event);
        match event {
            GameEvent::TileRevealed { button, kind, .. } if kind == "mole" => {
                presser.press(button);
            }
            GameEvent::RoundEnded { score } => {
                println!("[Sim] final score: {} points", score);
                break;
            }
            _ => {}
        }
    }

    session.abort();
    Ok(())
}
