//! Choreography scripts.
//!
//! Every multi-frame sequence in the game — the idle attract loop, the
//! ready/set/go countdown, the game-over summary, the per-kind strike
//! animations — is a static table of `(cue, hold_ms)` steps. The engine's
//! scheduler walks a table, hands each cue to the presenter, and sleeps for
//! the hold; presenters never sleep on their own. Keeping the timings as data
//! also lets tests assert pacing without running a clock.

use deck_mole_types::{AttractFrame, CountdownStage, SummaryFrame, TileKind, VisualPhase};

/// One choreography step: show `cue`, then hold it for `hold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<C: 'static> {
    pub cue: C,
    pub hold_ms: u64,
}

const fn step<C>(cue: C, hold_ms: u64) -> Step<C> {
    Step { cue, hold_ms }
}

/// Idle attract loop: the hammer-meets-mole vignette ending on the start
/// prompt. Replays periodically while the game waits for a player.
pub const ATTRACT: &[Step<AttractFrame>] = &[
    step(AttractFrame::Playfield, 500),
    step(AttractFrame::Hammer, 500),
    step(AttractFrame::Title, 500),
    step(AttractFrame::Burrow, 500),
    step(AttractFrame::Peek, 750),
    step(AttractFrame::Wallop, 150),
    step(AttractFrame::Bonked, 500),
    step(AttractFrame::StartPrompt, 0),
];

/// Ready / set / go, one beat each. The total is the fixed pacing of the
/// Starting phase, not a wait on the presenter.
pub const COUNTDOWN: &[Step<CountdownStage>] = &[
    step(CountdownStage::Ready, 1000),
    step(CountdownStage::Set, 1000),
    step(CountdownStage::Go, 1000),
];

/// Game-over summary beats, ending on the "again" prompt.
pub const SUMMARY: &[Step<SummaryFrame>] = &[
    step(SummaryFrame::Playfield, 250),
    step(SummaryFrame::GameOverSign, 500),
    step(SummaryFrame::You, 250),
    step(SummaryFrame::Scored, 500),
    step(SummaryFrame::Score, 250),
    step(SummaryFrame::Points, 250),
    step(SummaryFrame::Cheer, 1000),
    step(SummaryFrame::AgainPrompt, 0),
];

const MOLE_STRIKE: &[Step<VisualPhase>] = &[
    step(VisualPhase::Struck, 75),
    step(VisualPhase::Resolved, 150),
];

const DECOY_STRIKE: &[Step<VisualPhase>] = &[step(VisualPhase::Struck, 75), step(VisualPhase::Idle, 0)];

/// Strike animation for a pressed tile, by kind.
///
/// A mole shows the hammer coming down, then the aftermath. A decoy flashes
/// the hit and settles back to its resting face before the slot clears.
pub fn strike(kind: TileKind) -> &'static [Step<VisualPhase>] {
    match kind {
        TileKind::Mole => MOLE_STRIKE,
        TileKind::Decoy => DECOY_STRIKE,
    }
}
