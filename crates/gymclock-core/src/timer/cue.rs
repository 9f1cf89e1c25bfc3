//! Audible cue playback.
//!
//! Cues are fire-and-forget: a failed write must never reach the tick
//! path or alter timer state, so every implementation swallows errors.

use std::io::Write;

/// Something that can emit a short audible cue at a phase boundary.
pub trait Cue: Send {
    fn beep(&self);
}

/// Rings the terminal bell on stdout, falling back to stderr when the
/// primary write fails. Errors on both paths are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

const BELL: &[u8] = b"\x07";

impl Cue for TerminalBell {
    fn beep(&self) {
        let mut out = std::io::stdout();
        if out.write_all(BELL).and_then(|_| out.flush()).is_err() {
            let mut err = std::io::stderr();
            let _ = err.write_all(BELL).and_then(|_| err.flush());
        }
    }
}

/// No-op cue for tests and `--quiet` runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl Cue for SilentCue {
    fn beep(&self) {}
}
