//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lyricize\config.toml
//! - macOS: ~/Library/Application Support/lyricize/config.toml
//! - Linux: ~/.config/lyricize/config.toml
//!
//! The config file is human-readable and editable. Environment variables
//! and CLI flags override what it says for a single run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lyrics::genius::DEFAULT_API_URL;
use crate::lyrics::lyricsify::DEFAULT_BASE_URL;
use crate::lyrics::{RetryPolicy, RunPolicy};

/// Genius API token
pub const ENV_GENIUS_TOKEN: &str = "GENIUS_ACCESS_TOKEN";
/// `True` enables the synced source
pub const ENV_SYNCED: &str = "I_WANT_SYNCED_LYRICS";
/// User agent sent with every request
pub const ENV_USER_AGENT: &str = "HEADER";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// What a run may overwrite and accept
    pub policy: PolicyConfig,

    /// Request settings shared by both providers
    pub http: HttpConfig,

    /// Provider endpoints
    pub providers: ProvidersConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Genius API client access token; without it Genius is not searched
    pub genius_access_token: Option<String>,
}

/// Run policy defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Replace lyrics already in the file
    pub overwrite: bool,

    /// Let plain lyrics replace existing ones
    pub allow_unsynced_overwrite: bool,

    /// Discard hits whose artist/title don't match the tags
    pub require_exact_match: bool,

    /// Search Lyricsify for synced lyrics first
    pub synced_source_enabled: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = RunPolicy::default();
        Self {
            overwrite: policy.overwrite,
            allow_unsynced_overwrite: policy.allow_unsynced_overwrite,
            require_exact_match: policy.require_exact_match,
            synced_source_enabled: policy.synced_source_enabled,
        }
    }
}

/// HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Pause between tracks
    pub request_delay_ms: u64,

    /// Total attempts per request; 1 disables retries
    pub retry_max_attempts: u32,

    /// Sleep before the first retry, doubled after each one
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 20,
            request_delay_ms: 0,
            retry_max_attempts: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// Provider endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub lyricsify_base_url: String,
    pub genius_api_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            lyricsify_base_url: DEFAULT_BASE_URL.to_string(),
            genius_api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Apply `GENIUS_ACCESS_TOKEN`, `I_WANT_SYNCED_LYRICS` and `HEADER`.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_GENIUS_TOKEN) {
            self.credentials.genius_access_token = Some(token);
        }
        if let Some(flag) = lookup(ENV_SYNCED) {
            self.policy.synced_source_enabled = matches!(flag.trim(), "True" | "true" | "1");
        }
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|a| !a.trim().is_empty()) {
            self.http.user_agent = agent;
        }
    }

    /// The Genius token, if one is set and non-blank.
    pub fn genius_token(&self) -> Option<&str> {
        self.credentials
            .genius_access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn run_policy(&self) -> RunPolicy {
        RunPolicy {
            overwrite: self.policy.overwrite,
            allow_unsynced_overwrite: self.policy.allow_unsynced_overwrite,
            require_exact_match: self.policy.require_exact_match,
            synced_source_enabled: self.policy.synced_source_enabled,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        if self.http.retry_max_attempts <= 1 {
            return RetryPolicy::none();
        }
        RetryPolicy::exponential(
            self.http.retry_max_attempts,
            Duration::from_millis(self.http.retry_backoff_ms),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.max(1))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.http.request_delay_ms)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyricize"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => {
            tracing::debug!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
