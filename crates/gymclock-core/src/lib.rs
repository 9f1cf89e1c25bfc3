//! # Gymclock Core Library
//!
//! Core business logic for the Gymclock interval timer. The CLI binary is
//! a thin layer over this crate; the passthrough server is independent.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine that requires the
//!   caller to deliver one `tick()` per elapsed second; the `Ticker`
//!   owns the cancellable task that produces those seconds
//! - **Progress Store**: per-date completed-set counts and the daily
//!   target, persisted through a key-value boundary (SQLite-backed in
//!   production, in-memory in tests)
//! - **Calendar**: pure month/week projections over the progress store
//! - **Storage**: SQLite kv table and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`ProgressStore`]: daily progress tracking
//! - [`Database`]: kv persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod clock;
pub mod error;
pub mod events;
pub mod progress;
pub mod storage;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use progress::{DailyProgress, ProgressStore};
pub use storage::{Config, Database, KvStore, MemoryKv};
pub use timer::{Cue, Phase, SilentCue, TerminalBell, Ticker, TimerConfig, TimerEngine};
