mod config;
pub mod database;

pub use config::{Config, CueConfig, ExerciseConfig, ScheduleConfig};
pub use database::Database;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::StorageError;

/// Key-value persistence boundary.
///
/// The progress store and the CLI's engine snapshot both go through this
/// trait so they can be exercised against an in-memory map in tests.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory key-value store. Clones share the same entries, which lets
/// tests hold a handle to a store they have already moved elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns `~/.config/gymclock[-dev]/` based on GYMCLOCK_ENV.
///
/// Set GYMCLOCK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GYMCLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("gymclock-dev")
    } else {
        base_dir.join("gymclock")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
