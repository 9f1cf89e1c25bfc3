use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// The CLI prints them; the run loop reacts to boundary events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        set: u32,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        set: u32,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran to its zero boundary (naturally or via skip).
    /// `set` is the set the phase belonged to.
    PhaseCompleted {
        phase: Phase,
        set: u32,
        at: DateTime<Utc>,
    },
    /// The final Work phase finished; the engine has already stopped.
    /// `total_calories` is present only when calorie tracking is enabled.
    WorkoutCompleted {
        total_sets: u32,
        total_calories: Option<u32>,
        at: DateTime<Utc>,
    },
    /// The daily target changed (clamped value).
    TargetChanged {
        target_sets: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        seconds_remaining: u32,
        phase_seconds: u32,
        current_set: u32,
        total_sets: u32,
        running: bool,
        finished: bool,
        calories_accrued: u32,
        phase_progress_pct: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Boundary events are the ones that warrant an audible cue.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Event::PhaseCompleted { .. } | Event::WorkoutCompleted { .. }
        )
    }
}
