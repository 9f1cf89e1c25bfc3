mod cue;
mod engine;
mod ticker;

pub use cue::{Cue, SilentCue, TerminalBell};
pub use engine::{Phase, TimerConfig, TimerEngine};
pub use ticker::Ticker;
