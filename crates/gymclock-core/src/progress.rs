//! Daily set-completion progress.
//!
//! Two kv entries back the store: `progress_by_date`, a JSON map from
//! ISO date string to completed-set count, and `target_sets`, a decimal
//! integer string. Absent or corrupt payloads load as defaults; writes
//! are synchronous and best-effort -- a failing store degrades to
//! in-memory-only operation for the session.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::storage::KvStore;

pub const PROGRESS_KEY: &str = "progress_by_date";
pub const TARGET_KEY: &str = "target_sets";

const DEFAULT_TARGET_SETS: u32 = 5;

/// Projection of one calendar date's progress against the daily target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: String,
    pub completed_sets: u32,
    pub target_sets: u32,
    /// 0..=100, rounded.
    pub completion_pct: u8,
    pub calories_burned: f64,
    pub fully_completed: bool,
}

/// Append-only log of per-date completed-set counts plus the daily target.
pub struct ProgressStore {
    kv: Box<dyn KvStore>,
    progress_by_date: BTreeMap<String, u32>,
    /// Calories are session-scoped: they arrive with completions and are
    /// not part of the persisted surface.
    calories_by_date: BTreeMap<String, f64>,
    completed_dates: BTreeSet<String>,
    target_sets: u32,
}

impl ProgressStore {
    /// Read persisted state, falling back to defaults when either entry
    /// is absent or fails to parse. Completed dates are derived from the
    /// counts that already meet the target.
    pub fn load(kv: Box<dyn KvStore>) -> Self {
        let progress_by_date: BTreeMap<String, u32> = kv
            .get(PROGRESS_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();

        let target_sets = kv
            .get(TARGET_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(DEFAULT_TARGET_SETS);

        let completed_dates = progress_by_date
            .iter()
            .filter(|(_, &sets)| sets >= target_sets)
            .map(|(date, _)| date.clone())
            .collect();

        Self {
            kv,
            progress_by_date,
            calories_by_date: BTreeMap::new(),
            completed_dates,
            target_sets,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn target(&self) -> u32 {
        self.target_sets
    }

    pub fn sets_for(&self, date: &str) -> u32 {
        self.progress_by_date.get(date).copied().unwrap_or(0)
    }

    pub fn is_completed(&self, date: &str) -> bool {
        self.completed_dates.contains(date)
    }

    pub fn completed_dates(&self) -> &BTreeSet<String> {
        &self.completed_dates
    }

    pub fn progress_by_date(&self) -> &BTreeMap<String, u32> {
        &self.progress_by_date
    }

    /// One date's progress projection.
    pub fn day(&self, date: &str) -> DailyProgress {
        let completed_sets = self.sets_for(date);
        let pct = if self.target_sets == 0 {
            0.0
        } else {
            f64::from(completed_sets) / f64::from(self.target_sets) * 100.0
        };
        DailyProgress {
            date: date.to_string(),
            completed_sets,
            target_sets: self.target_sets,
            completion_pct: pct.round().clamp(0.0, 100.0) as u8,
            calories_burned: self.calories_by_date.get(date).copied().unwrap_or(0.0),
            fully_completed: self.completed_dates.contains(date),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Record one completed workout for `date`. The count is clamped to
    /// the current target; reaching the target marks the date completed
    /// exactly once. Returns the updated projection.
    pub fn record_completion(&mut self, date: &str, calories: Option<u32>) -> DailyProgress {
        let count = self.progress_by_date.entry(date.to_string()).or_insert(0);
        *count = (*count + 1).min(self.target_sets);
        let reached = *count >= self.target_sets;

        if let Some(kcal) = calories {
            *self.calories_by_date.entry(date.to_string()).or_insert(0.0) += f64::from(kcal);
        }
        if reached {
            self.completed_dates.insert(date.to_string());
        }
        self.persist_progress();
        self.day(date)
    }

    /// Set the daily target, clamped to at least 1. Persists immediately
    /// and returns the effective value.
    pub fn set_target(&mut self, target: u32) -> u32 {
        self.target_sets = target.max(1);
        let _ = self.kv.set(TARGET_KEY, &self.target_sets.to_string());
        self.target_sets
    }

    fn persist_progress(&self) {
        if let Ok(json) = serde_json::to_string(&self.progress_by_date) {
            // Best effort: a write failure leaves this session in-memory-only.
            let _ = self.kv.set(PROGRESS_KEY, &json);
        }
    }
}
