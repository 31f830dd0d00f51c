//! Application configuration structs
//!
//! Loads configuration from environment variables (and an optional `.env`).
//! Every value has a default; only unparsable values are errors.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageConfig,
    pub reconcile: ReconcileConfig,
    pub link_preview: LinkPreviewConfig,
    pub notices: NoticeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Starboard storage file
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

/// Reconciliation tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// How many recent starboard messages are scanned for a star post
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Debounce before a star post is deleted
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Maximum star post description length, in characters
    #[serde(default = "default_max_description")]
    pub max_description: usize,
    /// Keep an in-memory source -> star post index in front of the history scan
    #[serde(default)]
    pub post_index: bool,
}

impl ReconcileConfig {
    #[must_use]
    pub fn delete_delay(&self) -> Duration {
        Duration::from_millis(self.delete_delay_ms)
    }
}

/// Link preview image resolution
#[derive(Debug, Clone, Deserialize)]
pub struct LinkPreviewConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_link_timeout_secs")]
    pub timeout_secs: u64,
    /// Host whose pages are read for their media meta tag instead of trusting content-type
    #[serde(default = "default_link_host")]
    pub metadata_host: String,
}

impl LinkPreviewConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Plain-text notices posted when a star is refused
#[derive(Debug, Clone, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_self_star_notice")]
    pub self_star: String,
    #[serde(default = "default_bot_author_notice")]
    pub bot_author: String,
    #[serde(default = "default_empty_notice")]
    pub empty_content: String,
    #[serde(default = "default_already_starred_notice")]
    pub already_starred: String,
}

// Default value functions
fn default_app_name() -> String {
    "starboard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./starboards.json")
}

fn default_history_limit() -> usize {
    100
}

fn default_delete_delay_ms() -> u64 {
    1000
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_max_description() -> usize {
    2000
}

fn default_user_agent() -> String {
    concat!("starboard/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_link_timeout_secs() -> u64 {
    10
}

fn default_link_host() -> String {
    "tenor.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_self_star_notice() -> String {
    "You cannot star your own messages.".to_string()
}

fn default_bot_author_notice() -> String {
    "You cannot star bot messages.".to_string()
}

fn default_empty_notice() -> String {
    "You cannot star an empty message.".to_string()
}

fn default_already_starred_notice() -> String {
    "You can't star a message that is already in the starboard.".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            storage: StorageConfig {
                path: default_storage_path(),
            },
            reconcile: ReconcileConfig {
                history_limit: default_history_limit(),
                delete_delay_ms: default_delete_delay_ms(),
                leaderboard_size: default_leaderboard_size(),
                max_description: default_max_description(),
                post_index: false,
            },
            link_preview: LinkPreviewConfig {
                user_agent: default_user_agent(),
                timeout_secs: default_link_timeout_secs(),
                metadata_host: default_link_host(),
            },
            notices: NoticeConfig {
                enabled: true,
                self_star: default_self_star_notice(),
                bot_author: default_bot_author_notice(),
                empty_content: default_empty_notice(),
                already_starred: default_already_starred_notice(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parse = |key: &'static str| -> Result<Option<String>, ConfigError> {
            Ok(lookup(key).map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
        };

        let env = match parse("APP_ENV")? {
            None => default_env(),
            Some(s) => match s.to_lowercase().as_str() {
                "production" => Environment::Production,
                "staging" => Environment::Staging,
                "development" => Environment::Development,
                _ => return Err(ConfigError::InvalidValue("APP_ENV", s)),
            },
        };

        Ok(Self {
            app: AppSettings {
                name: parse("APP_NAME")?.unwrap_or_else(default_app_name),
                env,
            },
            storage: StorageConfig {
                path: parse("STARBOARD_STORAGE_PATH")?
                    .map_or_else(default_storage_path, PathBuf::from),
            },
            reconcile: ReconcileConfig {
                history_limit: parsed(&lookup, "STARBOARD_HISTORY_LIMIT")?
                    .unwrap_or_else(default_history_limit),
                delete_delay_ms: parsed(&lookup, "STARBOARD_DELETE_DELAY_MS")?
                    .unwrap_or_else(default_delete_delay_ms),
                leaderboard_size: parsed(&lookup, "STARBOARD_LEADERBOARD_SIZE")?
                    .unwrap_or_else(default_leaderboard_size),
                max_description: parsed(&lookup, "STARBOARD_MAX_DESCRIPTION")?
                    .unwrap_or_else(default_max_description),
                post_index: flag(&lookup, "STARBOARD_POST_INDEX")?.unwrap_or(false),
            },
            link_preview: LinkPreviewConfig {
                user_agent: parse("LINK_PREVIEW_USER_AGENT")?.unwrap_or_else(default_user_agent),
                timeout_secs: parsed(&lookup, "LINK_PREVIEW_TIMEOUT_SECS")?
                    .unwrap_or_else(default_link_timeout_secs),
                metadata_host: parse("LINK_PREVIEW_HOST")?.unwrap_or_else(default_link_host),
            },
            notices: NoticeConfig {
                enabled: flag(&lookup, "STARBOARD_NOTICES")?.unwrap_or(true),
                self_star: parse("STARBOARD_MSG_SELF_STAR")?
                    .unwrap_or_else(default_self_star_notice),
                bot_author: parse("STARBOARD_MSG_BOT_AUTHOR")?
                    .unwrap_or_else(default_bot_author_notice),
                empty_content: parse("STARBOARD_MSG_EMPTY")?.unwrap_or_else(default_empty_notice),
                already_starred: parse("STARBOARD_MSG_ALREADY_STARRED")?
                    .unwrap_or_else(default_already_starred_notice),
            },
        })
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key).map(|s| s.trim().to_string()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, s)),
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match lookup(key).map(|s| s.trim().to_lowercase()) {
        None => Ok(None),
        Some(s) => match s.as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue(key, s)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
