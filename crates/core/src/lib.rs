//! Core game logic — pure, deterministic, and testable.
//!
//! Everything in this crate is synchronous and free of I/O: the seedable RNG,
//! tile construction, the round bag, scoring rules, round bookkeeping, and
//! the choreography scripts the engine schedules. Given the same seed and
//! configuration, a round draws the same tiles with the same reveal windows,
//! which is what the integration tests lean on.
//!
//! # Module structure
//!
//! - [`rng`]: seedable LCG random source
//! - [`tile`]: tile construction and per-kind data
//! - [`bag`]: repetition-free random tile bag for one round
//! - [`scoring`]: pure scoring functions
//! - [`round`]: phase / progress / score bookkeeping
//! - [`script`]: choreography step tables (cues + hold times as data)

pub mod bag;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod script;
pub mod tile;

pub use bag::{EmptyBag, TileBag};
pub use rng::GameRng;
pub use round::RoundState;
pub use tile::Tile;
