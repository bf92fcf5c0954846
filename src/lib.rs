//! Whack-a-mole for button decks (workspace facade crate).
//!
//! This package keeps the public `deck_mole::{board,core,engine,present,types}`
//! API stable while the implementation lives in dedicated crates under
//! `crates/`.

pub use deck_mole_board as board;
pub use deck_mole_core as core;
pub use deck_mole_engine as engine;
pub use deck_mole_present as present;
pub use deck_mole_types as types;
