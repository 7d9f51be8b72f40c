//! TOML-based configuration for MergeGate.
//!
//! A single file describes the daemon, the project under review, the web
//! listener, snapshot persistence, and an optional delegation peer. Every
//! field except the project root has a sensible default, so a minimal config
//! is just `[project]` with a `root`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Daemon / logging settings.
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Project (git repository) under review.
    pub project: ProjectConfig,

    /// Review web service settings.
    #[serde(default)]
    pub web: WebConfig,

    /// Pending-request persistence settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Remote delegation settings.
    #[serde(default)]
    pub delegate: DelegateConfig,
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Project settings. The root is the git working copy all conflict
/// discovery and staging runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the repository root.
    pub root: PathBuf,
}

// ---------------------------------------------------------------------------
// Web service
// ---------------------------------------------------------------------------

/// Review web service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen address (default `127.0.0.1:3456`).
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Review mode: proposals are held until a reviewer decides, and
    /// proposals without a substantive reason are hidden from listings.
    #[serde(default)]
    pub review_mode: bool,
}

fn default_listen() -> String {
    "127.0.0.1:3456".into()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            review_mode: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Store persistence
// ---------------------------------------------------------------------------

/// Pending-request persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Path to the JSON snapshot of pending requests. Unset disables
    /// persistence; pending requests then live only in memory.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Delegation
// ---------------------------------------------------------------------------

/// Remote delegation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DelegateConfig {
    /// Base URL of a peer review service (e.g. `http://127.0.0.1:3456`).
    /// When set, all store operations are forwarded to the peer instead of
    /// being served from the local collection.
    #[serde(default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading & validating
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "project.root".into(),
                detail: "project root must not be empty".into(),
            });
        }
        if self.web.listen.is_empty() || !self.web.listen.contains(':') {
            return Err(ConfigError::InvalidValue {
                field: "web.listen".into(),
                detail: "listen address must be in 'host:port' format".into(),
            });
        }
        if let Some(ref url) = self.delegate.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "delegate.url".into(),
                    detail: "delegation URL must start with http:// or https://".into(),
                });
            }
        }

        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[daemon]
log_level = "debug"

[project]
root = "/work/myrepo"

[web]
listen = "0.0.0.0:8080"
review_mode = true

[store]
state_file = "/var/lib/mergegate/pending.json"

[delegate]
url = "http://review.example.com:3456"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.daemon.log_level, "debug");
        assert_eq!(config.project.root, PathBuf::from("/work/myrepo"));
        assert_eq!(config.web.listen, "0.0.0.0:8080");
        assert!(config.web.review_mode);
        assert_eq!(
            config.store.state_file,
            Some(PathBuf::from("/var/lib/mergegate/pending.json"))
        );
        assert_eq!(
            config.delegate.url.as_deref(),
            Some("http://review.example.com:3456")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_from_file(&path).expect("load_from_file failed");
        assert_eq!(config.daemon.log_level, "debug");
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_validate_rejects_empty_root() {
        let mut config: AppConfig = toml::from_str(sample_toml()).unwrap();
        config.project.root = PathBuf::new();
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "project.root"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_delegate_url() {
        let mut config: AppConfig = toml::from_str(sample_toml()).unwrap();
        config.delegate.url = Some("review.example.com".into());
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "delegate.url"
        ));
    }

    #[test]
    fn test_defaults() {
        let minimal = r#"
[project]
root = "/work/myrepo"
"#;
        let config: AppConfig = toml::from_str(minimal).unwrap();
        assert_eq!(config.daemon.log_level, "info");
        assert_eq!(config.web.listen, "127.0.0.1:3456");
        assert!(!config.web.review_mode);
        assert!(config.store.state_file.is_none());
        assert!(config.delegate.url.is_none());
        config.validate().expect("defaults should validate");
    }
}
