//! Application configuration
//!
//! Loaded from TOML, then overridden by environment variables. Every section
//! is optional in the file; missing values take their defaults.

use crate::error::AppError;
use quote_store::{DEFAULT_FILTER_KEY, DEFAULT_QUOTES_KEY, DEFAULT_SESSION_KEY};
use quote_sync::remote::{DEFAULT_FETCH_LIMIT, DEFAULT_REMOTE_URL, DEFAULT_TIMEOUT};
use quote_sync::{AutoSyncConfig, HttpRemote};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Variable naming a configuration file
pub const CONFIG_ENV: &str = "QUOTES_CONFIG";

/// Variable overriding [`StorageConfig::data_dir`]
pub const DATA_DIR_ENV: &str = "QUOTES_DATA_DIR";

/// Variable overriding [`RemoteConfig::base_url`]
pub const REMOTE_URL_ENV: &str = "QUOTES_REMOTE_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Durable storage
    pub storage: StorageConfig,
    /// Session storage
    pub session: SessionConfig,
    /// Remote source
    pub remote: RemoteConfig,
    /// Auto-sync periods
    pub sync: SyncConfig,
    /// Manual add behavior
    pub add: AddConfig,
}

/// Durable storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per key
    pub data_dir: PathBuf,
    /// Key of the quote list
    pub quotes_key: String,
    /// Key of the last selected filter
    pub filter_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".quotes"),
            quotes_key: DEFAULT_QUOTES_KEY.to_string(),
            filter_key: DEFAULT_FILTER_KEY.to_string(),
        }
    }
}

/// Session storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory for the session slot, `<data_dir>/session` when unset
    pub dir: Option<PathBuf>,
    /// Key of the session snapshot
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

/// Remote source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API root
    pub base_url: String,
    /// Posts requested per fetch
    pub fetch_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_URL.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Auto-sync settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Full sync period in seconds
    pub interval_secs: u64,
    /// New-quote check period in seconds
    pub check_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let defaults = AutoSyncConfig::default();
        Self {
            interval_secs: defaults.sync_interval.as_secs(),
            check_interval_secs: defaults.check_interval.as_secs(),
        }
    }
}

/// Manual add settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddConfig {
    /// Reject exact text + category duplicates
    pub reject_duplicates: bool,
    /// Title-case categories on add
    pub title_case_categories: bool,
}

impl Default for AddConfig {
    fn default() -> Self {
        Self {
            reject_duplicates: true,
            title_case_categories: true,
        }
    }
}

impl QuoteConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`AppError::Config`] on invalid TOML; `origin` is only used in the message.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|source| AppError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// File or parse failure.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::file("read", path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Resolve configuration the way the CLI does
    ///
    /// `explicit` wins over `$QUOTES_CONFIG`; with neither, defaults are used.
    /// Environment overrides are applied last.
    ///
    /// # Errors
    /// File or parse failure.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, AppError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(&path)?
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply `QUOTES_DATA_DIR` / `QUOTES_REMOTE_URL` from `lookup`
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(REMOTE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.remote.base_url = url;
        }
        self
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = dir.into();
        self
    }

    /// With remote base URL
    #[inline]
    #[must_use]
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote.base_url = url.into();
        self
    }

    /// With duplicate rejection on add
    #[inline]
    #[must_use]
    pub fn with_reject_duplicates(mut self, reject: bool) -> Self {
        self.add.reject_duplicates = reject;
        self
    }

    /// With auto-sync periods
    #[inline]
    #[must_use]
    pub fn with_sync_intervals(mut self, sync: Duration, check: Duration) -> Self {
        self.sync.interval_secs = sync.as_secs();
        self.sync.check_interval_secs = check.as_secs();
        self
    }

    /// Directory of the session slot
    #[must_use]
    pub fn session_dir(&self) -> PathBuf {
        self.session
            .dir
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("session"))
    }

    /// Auto-sync periods
    #[must_use]
    pub fn auto_sync(&self) -> AutoSyncConfig {
        AutoSyncConfig {
            sync_interval: Duration::from_secs(self.sync.interval_secs),
            check_interval: Duration::from_secs(self.sync.check_interval_secs),
        }
    }

    /// HTTP remote described by this configuration
    #[must_use]
    pub fn http_remote(&self) -> HttpRemote {
        HttpRemote::new(self.remote.base_url.clone())
            .with_limit(self.remote.fetch_limit)
            .with_timeout(Duration::from_secs(self.remote.timeout_secs))
    }
}
