//! ConfigRoot DTOs and migrations for `config.toml`.
//!
//! - V1.0.0: `backend`, `recorder` and `logging` sections

use medcheck_core::config::{BackendConfig, CheckerConfig, LoggingConfig, RecorderConfig};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigrationError, Migrator, Versioned};

/// Key of the versioned entry inside `config.toml`.
pub const CONFIG_ROOT_KEY: &str = "config_root";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConfigRootV1_0_0 {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Latest ConfigRoot version.
pub type ConfigRoot = ConfigRootV1_0_0;

impl IntoDomain<CheckerConfig> for ConfigRootV1_0_0 {
    fn into_domain(self) -> CheckerConfig {
        CheckerConfig {
            backend: self.backend,
            recorder: self.recorder,
            logging: self.logging,
        }
    }
}

impl FromDomain<CheckerConfig> for ConfigRootV1_0_0 {
    fn from_domain(config: CheckerConfig) -> Self {
        Self {
            backend: config.backend,
            recorder: config.recorder,
            logging: config.logging,
        }
    }
}

/// Creates the Migrator for `config_root` entries.
pub fn create_config_root_migrator() -> Result<Migrator, MigrationError> {
    let mut migrator = Migrator::builder().build();

    let path = Migrator::define(CONFIG_ROOT_KEY)
        .from::<ConfigRootV1_0_0>()
        .into_with_save::<CheckerConfig>();
    migrator.register(path)?;

    Ok(migrator)
}
