//! Configuration system for geopeer.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $GEOPEER_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/geopeer/config.toml
//!   3. ~/.config/geopeer/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeopeerConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub bind_addr: String,
    /// Seconds in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file. Created on first start.
    pub path: PathBuf,
    /// How long a handle waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub strategy: LookupStrategy,
}

/// How a radius lookup evaluates the containment predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// One containment query per stored peer. O(n) round-trips.
    #[default]
    PerRow,
    /// Containment evaluated inside a single scan query.
    SingleQuery,
}

impl LookupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerRow => "per_row",
            Self::SingleQuery => "single_query",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "per_row" => Some(Self::PerRow),
            "single_query" => Some(Self::SingleQuery),
            _ => None,
        }
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            shutdown_grace_secs: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: data_dir().join("peers.db"),
            busy_timeout_ms: 5_000,
        }
    }
}

impl ServerConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("geopeer")
}

pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".local").join("share"))
        .join("geopeer")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl GeopeerConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            GeopeerConfig::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("GEOPEER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&GeopeerConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply GEOPEER_* overrides. Unparseable values are ignored.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("GEOPEER_SERVER__BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = var("GEOPEER_SERVER__SHUTDOWN_GRACE_SECS") {
            if let Ok(s) = v.parse() {
                self.server.shutdown_grace_secs = s;
            }
        }
        if let Some(v) = var("GEOPEER_STORE__PATH") {
            self.store.path = PathBuf::from(v);
        }
        if let Some(v) = var("GEOPEER_STORE__BUSY_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.store.busy_timeout_ms = ms;
            }
        }
        if let Some(v) = var("GEOPEER_LOOKUP__STRATEGY") {
            if let Some(strategy) = LookupStrategy::parse(&v) {
                self.lookup.strategy = strategy;
            }
        }
    }
}
