//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::charts::{Locale, Theme};
use crate::comments::{RefreshConfig, WidgetConfig, MIN_COMMENT_LEN};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub comments: CommentsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chart builder configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartsConfig {
    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub theme: Theme,
}

/// Comments panel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_page_increment")]
    pub page_increment: usize,

    #[serde(default = "default_collapsed_page_size")]
    pub collapsed_page_size: usize,

    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_reply_preview_len")]
    pub reply_preview_len: usize,

    #[serde(default = "default_high_priority_secs")]
    pub high_priority_secs: i64,

    #[serde(default = "default_medium_priority_secs")]
    pub medium_priority_secs: i64,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_page_size() -> usize {
    10
}

fn default_page_increment() -> usize {
    15
}

fn default_collapsed_page_size() -> usize {
    15
}

fn default_min_length() -> usize {
    MIN_COMMENT_LEN
}

fn default_reply_preview_len() -> usize {
    100
}

fn default_high_priority_secs() -> i64 {
    5
}

fn default_medium_priority_secs() -> i64 {
    30
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_increment: default_page_increment(),
            collapsed_page_size: default_collapsed_page_size(),
            min_length: default_min_length(),
            reply_preview_len: default_reply_preview_len(),
            high_priority_secs: default_high_priority_secs(),
            medium_priority_secs: default_medium_priority_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl CommentsConfig {
    /// Paging settings for the widget
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            page_size: self.page_size,
            page_increment: self.page_increment,
            collapsed_page_size: self.collapsed_page_size,
            min_length: self.min_length,
            reply_preview_len: self.reply_preview_len,
        }
    }

    /// Cadences for the refresh hub
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            high_priority: Duration::seconds(self.high_priority_secs),
            medium_priority: Duration::seconds(self.medium_priority_secs),
            tick: std::time::Duration::from_millis(self.tick_ms),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first config file that exists wins. A file that exists but cannot be
    /// loaded is an error, so the caller can report it once logging is up.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("adminboard").join("config.toml")),
            Some(PathBuf::from("/etc/adminboard/config.toml")),
            Some(PathBuf::from("./adminboard.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file of `paths`, or fall back to the environment
    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(locale) = std::env::var("ADMINBOARD_LOCALE") {
            match locale.parse() {
                Ok(l) => self.charts.locale = l,
                Err(e) => tracing::warn!("Ignoring ADMINBOARD_LOCALE: {}", e),
            }
        }
        if let Ok(theme) = std::env::var("ADMINBOARD_THEME") {
            match theme.parse() {
                Ok(t) => self.charts.theme = t,
                Err(e) => tracing::warn!("Ignoring ADMINBOARD_THEME: {}", e),
            }
        }

        if let Ok(level) = std::env::var("ADMINBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ADMINBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Adminboard Configuration
#
# Environment variables override these settings:
# - ADMINBOARD_LOCALE
# - ADMINBOARD_THEME
# - ADMINBOARD_LOG_LEVEL
# - ADMINBOARD_LOG_FORMAT

[charts]
# Month label language: es or en
locale = "es"

# Chart theme: light or dark
theme = "light"

[comments]
# Comments shown after a thread loads
page_size = 10

# Comments added by "show more"
page_increment = 15

# Page size when the panel is collapsed
collapsed_page_size = 15

# Minimum comment length (characters, trimmed)
min_length = 4

# Characters of the replied-to comment shown while answering
reply_preview_len = 100

# Refresh cadence for expanded panels (seconds)
high_priority_secs = 5

# Refresh cadence for collapsed panels (seconds)
medium_priority_secs = 30

# How often the refresh loop checks for due subscriptions (ms)
tick_ms = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/adminboard/adminboard.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.charts.locale, Locale::Es);
        assert_eq!(config.charts.theme, Theme::Light);
        assert_eq!(config.comments.page_size, 10);
        assert_eq!(config.comments.min_length, 4);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adminboard.toml");
        std::fs::write(&path, "[charts]\nlocale = \"en\"\n\n[comments]\npage_size = 25\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.charts.locale, Locale::En);
        assert_eq!(config.charts.theme, Theme::Light);
        assert_eq!(config.comments.page_size, 25);
        assert_eq!(config.comments.page_increment, 15);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[charts]\nlocale = \"klingon\"\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[comments]\npage_size = 12\n").unwrap();

        let config = Config::load_first(&[missing.clone(), good]).unwrap();
        assert_eq!(config.comments.page_size, 12);

        let config = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.comments.page_size, 10);
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[comments\n").unwrap();

        let err = Config::load_first(&[bad]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_comment_conversions() {
        let comments = CommentsConfig::default();

        let widget = comments.widget_config();
        assert_eq!(widget.page_size, 10);
        assert_eq!(widget.collapsed_page_size, 15);

        let refresh = comments.refresh_config();
        assert_eq!(refresh.high_priority, Duration::seconds(5));
        assert_eq!(refresh.medium_priority, Duration::seconds(30));
        assert_eq!(refresh.tick, std::time::Duration::from_secs(1));
    }
}
