//! Configuration loading and types for notedown.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files (`load`)

mod load;
mod types;

use serde::{Deserialize, Serialize};

// Re-export all types for convenient access
pub use types::{FeatureConfig, SiteConfig, VaultConfig};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Top-level config
// =============================================================================

/// The top-level configuration: vault location, site settings, and the
/// dialect feature record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault: VaultConfig,
    pub site: SiteConfig,
    pub features: FeatureConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
vault:
  path: ./notes
  output: ./out
site:
  base_url: /garden
features:
  disable_broken_wikilinks: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.vault.path, std::path::PathBuf::from("./notes"));
        assert_eq!(config.site.base_url, "/garden");
        assert!(config.features.disable_broken_wikilinks);
        assert!(config.features.wikilinks);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.vault.output, std::path::PathBuf::from("public"));
        assert!(config.features.callouts);
    }
}
