//! CLI settings persisted as TOML
//!
//! Settings live in `~/.config/vendwatch/config.toml` (or the platform
//! equivalent). A missing or unparseable file falls back to defaults with a
//! warning; the backend URL and page sizes are the values people actually
//! change.
//!
//! A fully populated file:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_seconds = 30
//!
//! [output]
//! format = "human"
//! color = true
//!
//! [pages]
//! vendor_page_size = 20
//! service_page_size = 20
//!
//! [reminders]
//! window_days = 15
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use vendwatch_client::config::ClientConfig;
use vendwatch_core::model::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use vendwatch_core::status::DEFAULT_WINDOW_DAYS;

/// Top-level settings tree, one struct per file section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Rendering preferences
    #[serde(default)]
    pub output: OutputConfig,

    /// Listing page sizes
    #[serde(default)]
    pub pages: PagesConfig,

    /// Reminder sweep defaults
    #[serde(default)]
    pub reminders: RemindersConfig,

    /// Session cache
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the backend lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_secs(),
        }
    }
}

/// How listings and details are rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format, `human` or `json`
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Colorize human-format output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            color: true,
        }
    }
}

/// Rows per page for paged listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Vendor listings
    #[serde(default = "default_page_size")]
    pub vendor_page_size: u32,

    /// Service listings
    #[serde(default = "default_page_size")]
    pub service_page_size: u32,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            vendor_page_size: default_page_size(),
            service_page_size: default_page_size(),
        }
    }
}

/// Defaults for reminder sweeps and previews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// How many days ahead a deadline counts as due
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

/// Where cached tokens are kept between invocations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token cache file, `tokens.json` next to the config file when unset
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_output_format() -> String {
    "human".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl CliConfig {
    /// Settable keys in `section.field` form, in display order.
    pub const KEYS: &'static [&'static str] = &[
        "api.base_url",
        "api.timeout_seconds",
        "output.format",
        "output.color",
        "pages.vendor_page_size",
        "pages.service_page_size",
        "reminders.window_days",
        "session.token_path",
    ];

    /// Platform config file location.
    ///
    /// `~/.config/vendwatch/config.toml` on Linux; whatever `dirs` resolves
    /// on macOS and Windows.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vendwatch")
            .join("config.toml")
    }

    /// Read settings from the default location.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Read settings from `path`, falling back to defaults.
    ///
    /// A missing file is normal on first run. A file that fails to parse is
    /// reported and ignored rather than blocking the command.
    pub fn load_from(path: PathBuf) -> Self {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed config ignored");
                Self::default()
            }
        }
    }

    /// Write settings to `path`, creating missing parent directories.
    pub fn save_to(&self, path: PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(&path, rendered)?;
        debug!(path = %path.display(), "config written");

        Ok(())
    }

    /// Resolve the token cache path.
    pub fn token_path(&self) -> PathBuf {
        self.session.token_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vendwatch")
                .join("tokens.json")
        })
    }

    /// Build the HTTP client configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api.base_url.clone()).with_timeout(self.api.timeout_seconds)
    }

    /// Look up a value by dotted key, rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout_seconds" => self.api.timeout_seconds.to_string(),
            "output.format" => self.output.format.clone(),
            "output.color" => self.output.color.to_string(),
            "pages.vendor_page_size" => self.pages.vendor_page_size.to_string(),
            "pages.service_page_size" => self.pages.service_page_size.to_string(),
            "reminders.window_days" => self.reminders.window_days.to_string(),
            "session.token_path" => self.token_path().display().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Update a value by dotted key, validating before assignment.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api.base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(invalid(key, value, "http(s) URL"));
                }
                // trailing slash would double up when endpoint paths are joined
                self.api.base_url = value.trim_end_matches('/').to_string();
            }
            "api.timeout_seconds" => {
                self.api.timeout_seconds = parsed(key, value, "whole number of seconds")?;
            }
            "output.format" => {
                if value != "human" && value != "json" {
                    return Err(invalid(key, value, "human or json"));
                }
                self.output.format = value.to_string();
            }
            "output.color" => {
                self.output.color = parsed(key, value, "true or false")?;
            }
            "pages.vendor_page_size" => {
                self.pages.vendor_page_size = page_size(key, value)?;
            }
            "pages.service_page_size" => {
                self.pages.service_page_size = page_size(key, value)?;
            }
            "reminders.window_days" => {
                let days: i64 = parsed(key, value, "number of days, at least 1")?;
                if days < 1 {
                    return Err(invalid(key, value, "number of days, at least 1"));
                }
                self.reminders.window_days = days;
            }
            "session.token_path" => {
                self.session.token_path = Some(PathBuf::from(value));
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }

    /// Snapshot of every key with its current value.
    pub fn list(&self) -> Vec<(String, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn parsed<T: std::str::FromStr>(key: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value, expected))
}

fn page_size(key: &str, value: &str) -> Result<u32, ConfigError> {
    let hint = format!("integer between 1 and {}", MAX_PAGE_SIZE);
    let size: u32 = parsed(key, value, &hint)?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(key, value, &hint));
    }
    Ok(size)
}

/// Rejected `config --set` input.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Bad value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
