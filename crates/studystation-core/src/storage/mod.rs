mod config;
mod store;

pub use config::Config;
pub use store::{keys, Store};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/studystation[-dev]/` based on STUDYSTATION_ENV.
///
/// Set STUDYSTATION_ENV=dev to use a separate development data directory.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYSTATION_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studystation-dev")
    } else {
        base_dir.join("studystation")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
