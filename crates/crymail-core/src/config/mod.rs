//! Persisted configuration.

mod model;
mod store;
mod validation;

pub use model::{
    Config, DEFAULT_MAX_MESSAGES, GeneralConfig, IdentityConfig, KeyConfig, ReceiveConfig,
    SpoolConfig, data_dir,
};
pub use store::{CONFIG_ENV, config_file_path, load_config, load_config_from, save_config_to};
pub use validation::{ValidationError, ValidationResult, validate_config};
