//! Platform paths for medcheck files.
//!
//! Resolved with `AppPaths` from version-migrate unless a base directory is
//! given explicitly.
//!
//! ```text
//! ~/.config/medcheck/         # Config directory
//! └── config.toml
//!
//! ~/.local/share/medcheck/    # Data directory
//! └── sessions.jsonl          # Locally recorded sessions
//! ```

use medcheck_core::{CheckerError, Result};
use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

const APP_NAME: &str = "medcheck";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const RECORDS_FILE_NAME: &str = "sessions.jsonl";

#[derive(Debug, Clone, Default)]
pub struct MedcheckPaths {
    base: Option<PathBuf>,
}

impl MedcheckPaths {
    /// Paths in the platform's standard locations.
    pub fn new() -> Self {
        Self { base: None }
    }

    /// Paths rooted at `base`: `<base>/config` and `<base>/data`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => AppPaths::new(APP_NAME)
                .config_dir()
                .map_err(|e| CheckerError::config(format!("Cannot resolve config directory: {e}"))),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => AppPaths::new(APP_NAME)
                .data_dir()
                .map_err(|e| CheckerError::config(format!("Cannot resolve data directory: {e}"))),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Default location of the local session record store.
    pub fn records_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(RECORDS_FILE_NAME))
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
