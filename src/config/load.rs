//! Configuration loading from files.

use std::path::Path;

use super::{Config, ConfigError};

impl Config {
    /// Load the config from the command line argument, defaulting to
    /// `notedown.yaml`. A missing default file is not an error: the
    /// built-in defaults apply.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = config_file.is_some();
        let config_file = config_file.unwrap_or(Path::new("notedown.yaml"));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        if !config_file.exists() && !explicit {
            return Ok(Config::default());
        }
        Self::load_from_file(&config_file)
    }

    /// Load the config from a file path.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Validation(format!("failed to read config file: {}", e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Validation(format!("failed to parse config: {}", e))
        })
    }
}
