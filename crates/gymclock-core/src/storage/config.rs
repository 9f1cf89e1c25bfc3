//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Interval schedule (work/rest durations, set count)
//! - The active exercise profile for calorie estimates
//! - Audible cue behavior
//!
//! Configuration is stored at `~/.config/gymclock/config.toml`. The daily
//! target is NOT configured here -- it lives in the kv store alongside the
//! progress map and is adjusted through the `target` commands.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::timer::TimerConfig;

/// Interval schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_total_sets")]
    pub total_sets: u32,
    #[serde(default = "default_work_seconds")]
    pub work_seconds: u32,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    #[serde(default = "default_calorie_update_interval")]
    pub calorie_update_interval: u32,
}

/// Exercise profile driving calorie estimates. Optional; without one the
/// engine runs with calorie tracking disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    /// Estimated kcal burned across one full Work phase.
    pub calories_per_work_phase: f64,
}

/// Audible cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/gymclock/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub exercise: Option<ExerciseConfig>,
    #[serde(default)]
    pub cue: CueConfig,
}

// Default functions
fn default_total_sets() -> u32 {
    5
}
fn default_work_seconds() -> u32 {
    45
}
fn default_rest_seconds() -> u32 {
    15
}
fn default_calorie_update_interval() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            total_sets: default_total_sets(),
            work_seconds: default_work_seconds(),
            rest_seconds: default_rest_seconds(),
            calorie_update_interval: default_calorie_update_interval(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            exercise: None,
            cue: CueConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// Build the engine configuration, folding in the exercise profile
    /// when one is set.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            total_sets: self.schedule.total_sets.max(1),
            work_seconds: self.schedule.work_seconds.max(1),
            rest_seconds: self.schedule.rest_seconds.max(1),
            calories_per_work_phase: self
                .exercise
                .as_ref()
                .map(|e| e.calories_per_work_phase.max(0.0)),
            calorie_update_interval: self.schedule.calorie_update_interval.max(1),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.schedule.work_seconds, 45);
        assert_eq!(parsed.schedule.rest_seconds, 15);
        assert!(parsed.cue.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.work_seconds").as_deref(), Some("45"));
        assert_eq!(cfg.get("cue.enabled").as_deref(), Some("true"));
        assert!(cfg.get("schedule.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "schedule.work_seconds", "60").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "schedule.work_seconds").unwrap(),
            &serde_json::Value::Number(60.into())
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "cue.enabled", "false").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "cue.enabled").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "schedule.nonexistent", "1");
        assert!(result.is_err());
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "cue.enabled", "not_a_bool");
        assert!(result.is_err());
    }

    #[test]
    fn timer_config_defaults_disable_calories() {
        let cfg = Config::default();
        let timer = cfg.timer_config();
        assert_eq!(timer.total_sets, 5);
        assert_eq!(timer.work_seconds, 45);
        assert_eq!(timer.rest_seconds, 15);
        assert_eq!(timer.calorie_update_interval, 5);
        assert!(timer.calories_per_work_phase.is_none());
    }

    #[test]
    fn timer_config_folds_in_exercise_profile() {
        let cfg = Config {
            exercise: Some(ExerciseConfig {
                name: "Burpees".into(),
                calories_per_work_phase: 10.0,
            }),
            ..Config::default()
        };
        assert_eq!(cfg.timer_config().calories_per_work_phase, Some(10.0));
    }

    #[test]
    fn timer_config_clamps_degenerate_values() {
        let cfg = Config {
            schedule: ScheduleConfig {
                total_sets: 0,
                work_seconds: 0,
                rest_seconds: 0,
                calorie_update_interval: 0,
            },
            ..Config::default()
        };
        let timer = cfg.timer_config();
        assert_eq!(timer.total_sets, 1);
        assert_eq!(timer.work_seconds, 1);
        assert_eq!(timer.rest_seconds, 1);
        assert_eq!(timer.calorie_update_interval, 1);
    }

    #[test]
    fn exercise_section_roundtrips_through_toml() {
        let cfg = Config {
            exercise: Some(ExerciseConfig {
                name: "Kettlebell swings".into(),
                calories_per_work_phase: 12.5,
            }),
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        let exercise = parsed.exercise.unwrap();
        assert_eq!(exercise.name, "Kettlebell swings");
        assert_eq!(exercise.calories_per_work_phase, 12.5);
    }
}
