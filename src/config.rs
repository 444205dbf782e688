//! Configuration file structures for the upkeep engine.
//!
//! The engine reads a YAML configuration file, with every value
//! overridable through `UPKEEP_`-prefixed environment variables using `__`
//! as the section separator.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Maintenance service configuration
//! source:
//!   # Base URL of the maintenance service
//!   url: "https://ops.example.com"
//!
//!   # Api key for service authentication
//!   api_key: "abc123xyz"
//!
//! # Application configuration
//! app:
//!   # Context whose maintenance windows are fetched
//!   context: "Sales"
//!
//!   # Developer name of the application navigation falls back to
//!   home: "Welcome"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export UPKEEP_SOURCE__URL="https://ops.example.com"
//! export UPKEEP_SOURCE__API_KEY="abc123xyz"
//! export UPKEEP_APP__CONTEXT="Sales"
//! ```

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure for the upkeep engine.
#[derive(Deserialize)]
pub struct Config {
    /// Maintenance service configuration
    pub source: Source,
    /// Application configuration
    pub app: App,
}

/// Maintenance service connection settings.
#[derive(Deserialize)]
pub struct Source {
    /// Base URL of the maintenance service.
    ///
    /// Should include the protocol (http/https); a trailing slash is
    /// stripped at startup.
    pub url: String,

    /// Api key for service authentication.
    ///
    /// Sent as a query parameter on every request.
    pub api_key: String,
}

/// Application identity settings.
#[derive(Clone, Debug, Deserialize)]
pub struct App {
    /// Application context whose maintenance windows are fetched.
    pub context: String,

    /// Developer name of the home application used for navigation.
    pub home: String,
}

impl Config {
    /// Loads the configuration from a YAML file, applying `UPKEEP_`
    /// environment overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing, unparseable, or leaves
    /// a required field unset.
    pub fn load(path: &str) -> Result<Config, anyhow::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("UPKEEP_").split("__"))
            .extract()
            .with_context(|| format!("failed to load configuration from {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG_YAML: &str = r#"
source:
  url: "https://ops.example.com"
  api_key: "abc123xyz"

app:
  context: "Sales"
  home: "Welcome"
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    #[serial]
    fn test_load_from_yaml() {
        let temp_file = write_config(CONFIG_YAML);

        let config = Config::load(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.source.url, "https://ops.example.com");
        assert_eq!(config.source.api_key, "abc123xyz");
        assert_eq!(config.app.context, "Sales");
        assert_eq!(config.app.home, "Welcome");
    }

    #[test]
    #[serial]
    fn test_env_overrides_yaml() {
        let temp_file = write_config(CONFIG_YAML);

        unsafe { std::env::set_var("UPKEEP_SOURCE__API_KEY", "from-env") };
        let config = Config::load(temp_file.path().to_str().unwrap()).unwrap();
        unsafe { std::env::remove_var("UPKEEP_SOURCE__API_KEY") };

        assert_eq!(config.source.api_key, "from-env");
        assert_eq!(config.source.url, "https://ops.example.com");
    }

    #[test]
    #[serial]
    fn test_load_missing_file_fails() {
        assert!(Config::load("nonexistent_config.yaml").is_err());
    }

    #[test]
    #[serial]
    fn test_load_incomplete_config_fails() {
        let temp_file = write_config("source:\n  url: \"https://ops.example.com\"\n");

        assert!(Config::load(temp_file.path().to_str().unwrap()).is_err());
    }
}
