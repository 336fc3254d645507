//! Versioned on-disk representations of domain types.

mod config_root;

pub use config_root::{CONFIG_ROOT_KEY, ConfigRoot, ConfigRootV1_0_0, create_config_root_migrator};
