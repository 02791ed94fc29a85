//! TOML configuration for the client.
//!
//! Read from the platform config directory, e.g.
//! `~/.config/rpmsg-client/config.toml` on Linux:
//!
//! ```toml
//! [client]
//! device = "/dev/rpmsg0"    # optional; discovery runs when absent
//! timeout_secs = 2.0
//! log_level = "info"
//! ```
//!
//! A missing file yields [`AppConfig::default`]; partial files are filled in
//! through serde defaults, so upgrades never break an existing config.
//! Precedence is CLI flag > config file > discovery/built-in default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
}

/// Client behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Fixed device path.  When absent, `/dev` discovery runs instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
    /// Default response wait in seconds for batch mode.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// `tracing` log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout_secs() -> f64 {
    2.0
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device: None,
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(base.join("rpmsg-client").join("config.toml"))
}

/// Loads the configuration from the platform config file, returning defaults
/// when no file exists.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found"
/// and [`ConfigError::Parse`] for malformed TOML.
pub fn load() -> Result<AppConfig, ConfigError> {
    load_from(&config_file_path()?)
}

/// Loads the configuration from an explicit path (separated out for tests).
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let cfg = load_from(&path).expect("load");

        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.client.timeout_secs, 2.0);
        assert_eq!(cfg.client.log_level, "info");
        assert_eq!(cfg.client.device, None);
    }

    #[test]
    fn test_partial_file_fills_in_serde_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[client]\ndevice = \"/dev/rpmsg1\"\n").expect("write");

        let cfg = load_from(&path).expect("load");

        assert_eq!(cfg.client.device.as_deref(), Some(std::path::Path::new("/dev/rpmsg1")));
        assert_eq!(cfg.client.timeout_secs, 2.0);
        assert_eq!(cfg.client.log_level, "info");
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[client\n").expect("write");

        let err = load_from(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let cfg = AppConfig {
            client: ClientConfig {
                device: Some(PathBuf::from("/dev/rpmsg0")),
                timeout_secs: 5.0,
                log_level: "debug".to_string(),
            },
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: AppConfig = toml::from_str(&text).expect("parse");

        assert_eq!(back, cfg);
    }
}
