//! Persistence.
//!
//! The engine sees storage only through [`StateStore`]: a string key to a
//! JSON document. [`Database`] keeps those documents in SQLite,
//! [`MemoryStore`] keeps them in memory for tests and dry runs.

pub mod config;
pub mod database;
mod memory;
pub mod state;

pub use config::{Config, EngineConfig, LoggingConfig, NotificationsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Key/value persistence collaborator.
pub trait StateStore: Send {
    /// `Ok(None)` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `EQUILIBRIO_DATA_DIR` wins outright. Otherwise `~/.config/equilibrio`,
/// or `~/.config/equilibrio-dev` when `EQUILIBRIO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("EQUILIBRIO_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("EQUILIBRIO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("equilibrio-dev")
            } else {
                base_dir.join("equilibrio")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
