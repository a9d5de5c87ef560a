//! Shared configuration for the roster tools.
//!
//! TOML file + `ROSTER_*` environment overlay, resolved into validated
//! [`Settings`] and translated to `roster-core` / `roster-api`
//! parameters. The core crates never read files or the environment --
//! the binary loads settings here and hands the pieces in.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use roster_core::PagerConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Resolved application settings.
///
/// Precedence: built-in defaults < TOML file < `ROSTER_*` environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory service base URL.
    pub endpoint: Url,
    /// People requested per page.
    pub page_limit: u32,
    /// Rows from the end of the list within which a prefetch is armed.
    pub visible_threshold: usize,
    /// Delay in milliseconds before a failed fetch is retried.
    pub retry_delay_ms: u64,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Log file path (the TUI never logs to stdout).
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("http://localhost:8080/").expect("literal URL"),
            page_limit: 50,
            visible_threshold: 2,
            retry_delay_ms: 2000,
            request_timeout_secs: 30,
            log_file: PathBuf::from("/tmp/roster-tui.log"),
        }
    }
}

impl Settings {
    /// Default config file location (`~/.config/roster/config.toml` on
    /// Linux, the platform equivalent elsewhere).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "roster", "roster").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load settings: defaults, then the TOML file (explicit path or the
    /// default location), then `ROSTER_*` environment variables.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(Self::default_path);
        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        let settings: Settings = figment.merge(Env::prefixed("ROSTER_")).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 {
            return Err(ConfigError::Validation {
                field: "page_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.retry_delay_ms == 0 {
            return Err(ConfigError::Validation {
                field: "retry_delay_ms".into(),
                reason: "must be non-zero".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "request_timeout_secs".into(),
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }

    // ── Translation to core/api parameters ───────────────────────

    /// Pager tuning derived from these settings.
    pub fn pager_config(&self) -> PagerConfig {
        PagerConfig {
            visible_threshold: self.visible_threshold,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let settings = Settings::default();
        assert_eq!(settings.visible_threshold, 2);
        assert_eq!(settings.retry_delay_ms, 2000);
        assert_eq!(settings.pager_config().retry_delay, Duration::from_millis(2000));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    endpoint = "https://people.example.com/"
                    page_limit = 25
                "#,
            )?;

            let settings = Settings::load(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(settings.endpoint.as_str(), "https://people.example.com/");
            assert_eq!(settings.page_limit, 25);
            // Untouched keys keep their defaults.
            assert_eq!(settings.visible_threshold, 2);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "page_limit = 25")?;
            jail.set_env("ROSTER_PAGE_LIMIT", "10");
            jail.set_env("ROSTER_RETRY_DELAY_MS", "500");

            let settings = Settings::load(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(settings.page_limit, 10);
            assert_eq!(settings.retry_delay_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn zero_page_limit_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "page_limit = 0")?;

            let result = Settings::load(Some(Path::new("config.toml")));
            assert!(matches!(
                result,
                Err(ConfigError::Validation { ref field, .. }) if field == "page_limit"
            ));
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|jail| {
            // No file created in the jail; env is clean.
            let _ = jail;
            let settings = Settings::load(Some(Path::new("does-not-exist.toml"))).unwrap();
            assert_eq!(settings.page_limit, 50);
            Ok(())
        });
    }
}
