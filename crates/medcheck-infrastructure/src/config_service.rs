//! Configuration service.
//!
//! Loads `CheckerConfig` from `config.toml` (in the platform config directory
//! unless an explicit path is given) through version-migrate's `FileStorage`,
//! applies environment overrides, and caches the result.

use crate::dto::{CONFIG_ROOT_KEY, create_config_root_migrator};
use crate::paths::{MedcheckPaths, expand_home};
use medcheck_core::config::CheckerConfig;
use medcheck_core::{CheckerError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior, MigrationError};

pub const ENV_BACKEND_URL: &str = "MEDCHECK_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEDCHECK_TIMEOUT_SECS";

/// Loads and caches the symptom checker configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: MedcheckPaths,
    explicit_path: Option<PathBuf>,
    config: Arc<RwLock<Option<CheckerConfig>>>,
}

impl ConfigService {
    /// Reads `config.toml` from the platform config directory.
    pub fn new(paths: MedcheckPaths) -> Self {
        Self {
            paths,
            explicit_path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads the given file instead of the default location.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn paths(&self) -> &MedcheckPaths {
        &self.paths
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.explicit_path {
            Some(path) => Ok(expand_home(path)),
            None => self.paths.config_file(),
        }
    }

    /// Returns the effective configuration, loading it on first access.
    pub fn get_config(&self) -> Result<CheckerConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Where file-mode recording writes, after defaults are applied.
    pub fn records_file(&self, config: &CheckerConfig) -> Result<PathBuf> {
        match &config.recorder.file_path {
            Some(path) => Ok(expand_home(path)),
            None => self.paths.records_file(),
        }
    }

    /// Loads `CheckerConfig` through `FileStorage`.
    ///
    /// A missing file is created with defaults.
    fn load(&self) -> Result<CheckerConfig> {
        let path = self.config_path()?;
        let config_error =
            |action: &str, e: MigrationError| CheckerError::config(format!("{action} {}: {e}", path.display()));

        let migrator =
            create_config_root_migrator().map_err(|e| config_error("Failed to prepare migrator for", e))?;
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        let mut storage = FileStorage::new(path.clone(), migrator, strategy)
            .map_err(|e| config_error("Failed to read", e))?;
        let configs: Vec<CheckerConfig> = storage
            .query(CONFIG_ROOT_KEY)
            .map_err(|e| config_error("Invalid configuration in", e))?;

        let mut config = match configs.into_iter().next() {
            Some(config) => config,
            None => {
                let defaults = CheckerConfig::default();
                storage
                    .update_and_save(CONFIG_ROOT_KEY, vec![defaults.clone()])
                    .map_err(|e| config_error("Failed to write default configuration to", e))?;
                tracing::debug!(path = %path.display(), "[ConfigService] Wrote default configuration");
                defaults
            }
        };

        apply_overrides(&mut config, |key| std::env::var(key).ok())?;
        tracing::debug!(
            path = %path.display(),
            base_url = %config.backend.base_url,
            recorder = ?config.recorder.mode,
            "[ConfigService] Configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(MedcheckPaths::new())
    }
}

/// Applies environment overrides, read through `lookup`.
pub fn apply_overrides(
    config: &mut CheckerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend.base_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
        config.backend.request_timeout_secs = raw.trim().parse().map_err(|_| {
            CheckerError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
        })?;
    }
    Ok(())
}
