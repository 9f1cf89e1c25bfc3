//! Interval timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a clock or
//! spawn threads - the caller delivers one `tick()` per elapsed second
//! (see [`Ticker`](super::Ticker) for the scheduling half).
//!
//! ## State Transitions
//!
//! ```text
//! Work(running|paused) -> Rest(running|paused) -> Work(next set) -> ... -> finished
//! ```
//!
//! A workout is `total_sets` Work phases with a Rest phase between
//! consecutive sets. The final Work phase completes the workout directly;
//! there is no trailing rest. After completion the engine refuses `start()`
//! until `reset()`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

/// Engine configuration, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Number of Work phases in one workout.
    pub total_sets: u32,
    /// Work phase duration in seconds.
    pub work_seconds: u32,
    /// Rest phase duration in seconds.
    pub rest_seconds: u32,
    /// Estimated kcal burned across one full Work phase. `None` disables
    /// calorie tracking entirely.
    pub calories_per_work_phase: Option<f64>,
    /// How many Work seconds elapse between calorie credits.
    pub calorie_update_interval: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_sets: 5,
            work_seconds: 45,
            rest_seconds: 15,
            calories_per_work_phase: None,
            calorie_update_interval: 5,
        }
    }
}

/// Core interval timer engine.
///
/// Counts whole seconds -- no sub-second precision, no wall-clock reads.
/// The caller is responsible for delivering `tick()` once per second while
/// the engine is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: Phase,
    /// Remaining whole seconds in the current phase.
    seconds_remaining: u32,
    /// 1-based set counter. Parked at `total_sets + 1` after completion,
    /// which is what disables restart until `reset()`.
    current_set: u32,
    running: bool,
    /// Whole kcal credited so far. Monotonic until `reset()`.
    calories_accrued: u32,
    /// Work seconds elapsed since the last calorie credit.
    #[serde(default)]
    since_accrual: u32,
    /// Kcal already credited for the current Work phase.
    #[serde(default)]
    phase_credited: u32,
}

impl TimerEngine {
    pub fn new(config: TimerConfig) -> Self {
        let seconds_remaining = config.work_seconds;
        Self {
            config,
            phase: Phase::Work,
            seconds_remaining,
            current_set: 1,
            running: false,
            calories_accrued: 0,
            since_accrual: 0,
            phase_credited: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn calories_accrued(&self) -> u32 {
        self.calories_accrued
    }

    /// True once the final Work phase has completed. Start is refused in
    /// this state; only `reset()` re-arms the engine.
    pub fn is_finished(&self) -> bool {
        self.current_set > self.config.total_sets
    }

    /// Configured duration of the current phase in seconds.
    pub fn phase_seconds(&self) -> u32 {
        match self.phase {
            Phase::Work => self.config.work_seconds,
            Phase::Rest => self.config.rest_seconds,
        }
    }

    /// 0..=100 progress within the current phase.
    pub fn phase_progress_pct(&self) -> u32 {
        let total = self.phase_seconds();
        if total == 0 {
            return 0;
        }
        let elapsed = total.saturating_sub(self.seconds_remaining);
        (f64::from(elapsed) / f64::from(total) * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            phase_seconds: self.phase_seconds(),
            current_set: self.current_set,
            total_sets: self.config.total_sets,
            running: self.running,
            finished: self.is_finished(),
            calories_accrued: self.calories_accrued,
            phase_progress_pct: self.phase_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. Idempotent while running; refused after the
    /// workout has finished.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.is_finished() {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            set: self.current_set,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Stop the countdown, preserving phase, seconds, set and calories.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            set: self.current_set,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Invert the running flag.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Unconditionally return to the initial state. Idempotent.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Work;
        self.seconds_remaining = self.config.work_seconds;
        self.current_set = 1;
        self.running = false;
        self.calories_accrued = 0;
        self.since_accrual = 0;
        self.phase_credited = 0;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Force the current phase to its boundary, as if the countdown had
    /// reached zero, without crediting the phase's remaining calories.
    ///
    /// Works while paused as well as while running. The returned boundary
    /// event is produced synchronously so the caller can cue immediately
    /// instead of waiting for the next tick.
    pub fn skip(&mut self) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        self.seconds_remaining = 0;
        self.since_accrual = 0;
        Some(self.advance())
    }

    /// Deliver one elapsed second. Call exactly once per second while the
    /// engine is running; a no-op otherwise.
    ///
    /// Returns the boundary event when the tick ends a phase (the caller
    /// should cue on it), `None` for an ordinary countdown second.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.phase == Phase::Work {
            self.accrue_calories();
        }
        if self.seconds_remaining == 0 {
            return Some(self.advance());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Credit calories for the second that just elapsed in a Work phase.
    ///
    /// Credit lands every `calorie_update_interval` seconds, plus a final
    /// partial credit when the phase ends mid-interval. Each credit is the
    /// whole-kcal delta against the rounded cumulative estimate, so one
    /// natural phase always sums to `round(calories_per_work_phase)`.
    fn accrue_calories(&mut self) {
        let Some(per_phase) = self.config.calories_per_work_phase else {
            return;
        };
        if self.config.work_seconds == 0 {
            return;
        }
        self.since_accrual += 1;
        let interval_done = self.since_accrual >= self.config.calorie_update_interval;
        let phase_done = self.seconds_remaining == 0;
        if interval_done || phase_done {
            let elapsed = self.config.work_seconds - self.seconds_remaining;
            let per_second = per_phase / f64::from(self.config.work_seconds);
            let cumulative = (per_second * f64::from(elapsed)).round() as u32;
            self.calories_accrued += cumulative.saturating_sub(self.phase_credited);
            self.phase_credited = cumulative;
            self.since_accrual = 0;
        }
    }

    /// Apply the phase/set transition rules at a zero boundary.
    fn advance(&mut self) -> Event {
        self.since_accrual = 0;
        self.phase_credited = 0;
        let at = Utc::now();
        match self.phase {
            Phase::Work => {
                if self.current_set >= self.config.total_sets {
                    // Final set done: stop and park the set counter one
                    // past the end so restart stays disabled.
                    self.running = false;
                    self.current_set = self.config.total_sets + 1;
                    Event::WorkoutCompleted {
                        total_sets: self.config.total_sets,
                        total_calories: self
                            .config
                            .calories_per_work_phase
                            .map(|_| self.calories_accrued),
                        at,
                    }
                } else {
                    self.phase = Phase::Rest;
                    self.seconds_remaining = self.config.rest_seconds;
                    Event::PhaseCompleted {
                        phase: Phase::Work,
                        set: self.current_set,
                        at,
                    }
                }
            }
            Phase::Rest => {
                let finished_set = self.current_set;
                self.current_set += 1;
                self.phase = Phase::Work;
                self.seconds_remaining = self.config.work_seconds;
                Event::PhaseCompleted {
                    phase: Phase::Rest,
                    set: finished_set,
                    at,
                }
            }
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_calories(per_phase: f64) -> TimerEngine {
        TimerEngine::new(TimerConfig {
            calories_per_work_phase: Some(per_phase),
            ..TimerConfig::default()
        })
    }

    /// Run `n` ticks, returning every boundary event produced.
    fn run_ticks(engine: &mut TimerEngine, n: u32) -> Vec<Event> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn starts_idle_in_work_phase() {
        let engine = TimerEngine::default();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.seconds_remaining(), 45);
        assert_eq!(engine.current_set(), 1);
        assert!(!engine.is_running());
        assert_eq!(engine.calories_accrued(), 0);
    }

    #[test]
    fn start_pause_toggle() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        assert!(engine.is_running());
        // Idempotent while running.
        assert!(engine.start().is_none());

        assert!(engine.pause().is_some());
        assert!(!engine.is_running());
        assert!(engine.pause().is_none());

        assert!(engine.toggle().is_some());
        assert!(engine.is_running());
        assert!(engine.toggle().is_some());
        assert!(!engine.is_running());
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick().is_none());
        assert_eq!(engine.seconds_remaining(), 45);
    }

    #[test]
    fn pause_preserves_state_exactly() {
        let mut engine = engine_with_calories(10.0);
        engine.start();
        run_ticks(&mut engine, 12);
        let (phase, secs, set, kcal) = (
            engine.phase(),
            engine.seconds_remaining(),
            engine.current_set(),
            engine.calories_accrued(),
        );
        engine.pause();
        run_ticks(&mut engine, 30);
        assert_eq!(engine.phase(), phase);
        assert_eq!(engine.seconds_remaining(), secs);
        assert_eq!(engine.current_set(), set);
        assert_eq!(engine.calories_accrued(), kcal);
    }

    #[test]
    fn work_transitions_to_rest_at_zero() {
        let mut engine = TimerEngine::default();
        engine.start();
        let events = run_ticks(&mut engine, 45);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::PhaseCompleted { phase: Phase::Work, set: 1, .. }
        ));
        assert_eq!(engine.phase(), Phase::Rest);
        assert_eq!(engine.seconds_remaining(), 15);
        assert_eq!(engine.current_set(), 1);
        assert!(engine.is_running());
    }

    #[test]
    fn rest_advances_to_next_set() {
        let mut engine = TimerEngine::default();
        engine.start();
        run_ticks(&mut engine, 45 + 15);
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.current_set(), 2);
        assert_eq!(engine.seconds_remaining(), 45);
    }

    #[test]
    fn full_run_completes_exactly_once_with_no_trailing_rest() {
        for total_sets in 1..=6 {
            let mut engine = TimerEngine::new(TimerConfig {
                total_sets,
                ..TimerConfig::default()
            });
            engine.start();
            let ticks = total_sets * (45 + 15) - 15;
            let completions = run_ticks(&mut engine, ticks)
                .into_iter()
                .filter(|e| matches!(e, Event::WorkoutCompleted { .. }))
                .count();
            assert_eq!(completions, 1, "total_sets = {total_sets}");
            assert!(engine.is_finished());
            assert!(!engine.is_running());
            // No further countdown after completion.
            assert!(run_ticks(&mut engine, 100).is_empty());
        }
    }

    #[test]
    fn start_refused_after_completion() {
        let mut engine = TimerEngine::new(TimerConfig {
            total_sets: 1,
            ..TimerConfig::default()
        });
        engine.start();
        run_ticks(&mut engine, 45);
        assert!(engine.is_finished());
        assert!(engine.start().is_none());
        assert!(!engine.is_running());
    }

    #[test]
    fn reset_yields_initial_state_from_anywhere() {
        let initial = TimerEngine::default();
        let mut engine = engine_with_calories(8.0);
        engine.start();
        run_ticks(&mut engine, 100);
        engine.reset();
        assert_eq!(engine.phase(), initial.phase());
        assert_eq!(engine.seconds_remaining(), initial.seconds_remaining());
        assert_eq!(engine.current_set(), initial.current_set());
        assert!(!engine.is_running());
        assert_eq!(engine.calories_accrued(), 0);
        // Idempotent.
        engine.reset();
        assert_eq!(engine.seconds_remaining(), initial.seconds_remaining());
        assert_eq!(engine.current_set(), 1);
    }

    #[test]
    fn reset_rearms_a_finished_engine() {
        let mut engine = TimerEngine::new(TimerConfig {
            total_sets: 1,
            ..TimerConfig::default()
        });
        engine.start();
        run_ticks(&mut engine, 45);
        assert!(engine.is_finished());
        engine.reset();
        assert!(!engine.is_finished());
        assert!(engine.start().is_some());
    }

    #[test]
    fn skip_work_moves_to_rest_without_calorie_credit() {
        let mut engine = engine_with_calories(10.0);
        engine.start();
        run_ticks(&mut engine, 7); // one 5-second credit has landed
        let kcal = engine.calories_accrued();
        let event = engine.skip().unwrap();
        assert!(matches!(
            event,
            Event::PhaseCompleted { phase: Phase::Work, set: 1, .. }
        ));
        assert_eq!(engine.phase(), Phase::Rest);
        assert_eq!(engine.seconds_remaining(), 15);
        assert_eq!(engine.calories_accrued(), kcal);
    }

    #[test]
    fn skip_works_while_paused() {
        let mut engine = TimerEngine::default();
        let event = engine.skip().unwrap();
        assert!(matches!(event, Event::PhaseCompleted { phase: Phase::Work, .. }));
        assert_eq!(engine.phase(), Phase::Rest);
        assert!(!engine.is_running());
    }

    #[test]
    fn skipping_final_work_completes_the_workout() {
        let mut engine = TimerEngine::new(TimerConfig {
            total_sets: 2,
            ..TimerConfig::default()
        });
        engine.start();
        run_ticks(&mut engine, 45 + 15); // set 2, Work
        let event = engine.skip().unwrap();
        assert!(matches!(event, Event::WorkoutCompleted { total_sets: 2, .. }));
        assert!(engine.is_finished());
        assert!(!engine.is_running());
        // Skip after completion is refused.
        assert!(engine.skip().is_none());
    }

    #[test]
    fn seconds_stay_within_phase_bounds() {
        let mut engine = TimerEngine::default();
        engine.start();
        for _ in 0..(5 * 60) {
            engine.tick();
            assert!(engine.seconds_remaining() <= engine.phase_seconds());
        }
    }

    #[test]
    fn one_work_phase_accrues_the_configured_total_within_one_kcal() {
        let mut engine = engine_with_calories(10.0);
        engine.start();
        run_ticks(&mut engine, 45);
        let accrued = f64::from(engine.calories_accrued());
        assert!(
            (accrued - 10.0).abs() <= 1.0,
            "accrued {accrued}, expected 10 +/- 1"
        );
    }

    #[test]
    fn calories_monotonic_during_work_frozen_during_rest() {
        let mut engine = engine_with_calories(20.0);
        engine.start();
        let mut last = 0;
        for _ in 0..45 {
            engine.tick();
            assert!(engine.calories_accrued() >= last);
            last = engine.calories_accrued();
        }
        assert_eq!(engine.phase(), Phase::Rest);
        let frozen = engine.calories_accrued();
        run_ticks(&mut engine, 14);
        assert_eq!(engine.calories_accrued(), frozen);
    }

    #[test]
    fn calories_disabled_without_a_profile() {
        let mut engine = TimerEngine::default();
        engine.start();
        run_ticks(&mut engine, 45);
        assert_eq!(engine.calories_accrued(), 0);
    }

    #[test]
    fn completion_event_carries_the_calorie_total() {
        let mut engine = TimerEngine::new(TimerConfig {
            total_sets: 1,
            calories_per_work_phase: Some(10.0),
            ..TimerConfig::default()
        });
        engine.start();
        let events = run_ticks(&mut engine, 45);
        match events.last() {
            Some(Event::WorkoutCompleted { total_calories: Some(kcal), .. }) => {
                assert!((f64::from(*kcal) - 10.0).abs() <= 1.0);
            }
            other => panic!("expected WorkoutCompleted with calories, got {other:?}"),
        }
    }

    #[test]
    fn completion_event_omits_calories_when_tracking_disabled() {
        let mut engine = TimerEngine::new(TimerConfig {
            total_sets: 1,
            ..TimerConfig::default()
        });
        engine.start();
        let events = run_ticks(&mut engine, 45);
        assert!(matches!(
            events.last(),
            Some(Event::WorkoutCompleted { total_calories: None, .. })
        ));
    }

    #[test]
    fn snapshot_reflects_engine_state() {
        let mut engine = TimerEngine::default();
        engine.start();
        run_ticks(&mut engine, 9);
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                seconds_remaining,
                phase_seconds,
                current_set,
                running,
                phase_progress_pct,
                ..
            } => {
                assert_eq!(phase, Phase::Work);
                assert_eq!(seconds_remaining, 36);
                assert_eq!(phase_seconds, 45);
                assert_eq!(current_set, 1);
                assert!(running);
                assert_eq!(phase_progress_pct, 20);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_snapshot_roundtrips_through_json() {
        let mut engine = engine_with_calories(12.0);
        engine.start();
        run_ticks(&mut engine, 50);
        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.phase(), engine.phase());
        assert_eq!(restored.seconds_remaining(), engine.seconds_remaining());
        assert_eq!(restored.current_set(), engine.current_set());
        assert_eq!(restored.calories_accrued(), engine.calories_accrued());
    }
}
