//! User configuration and logging setup.
//!
//! Configuration lives in `$XDG_CONFIG_HOME/anfeeds/config.toml`. Every field is
//! optional; a missing or unparsable file falls back to defaults with a note on
//! stderr, printed before the terminal enters raw mode.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anfeeds_core::{Catalog, LoginPolicy};
use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Login timing; the mock backend's latency plus the retry/timeout policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub latency_ms: u64,
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            timeout_ms: 10_000,
            retries: 2,
            backoff_ms: 250,
        }
    }
}

impl LoginConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn policy(&self) -> LoginPolicy {
        LoginPolicy {
            timeout: Duration::from_millis(self.timeout_ms),
            retries: self.retries,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Holds the preferences database and the log file.
    pub data_dir: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Optional TOML catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// How long notifications stay on screen.
    pub notification_ms: u64,
    pub login: LoginConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".anfeeds"),
            log_level: "info".to_owned(),
            catalog_path: None,
            notification_ms: 3000,
            login: LoginConfig::default(),
        }
    }
}

impl Config {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("preferences.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("anfeeds.log")
    }
}

/// Returns the path to the anfeeds config file.
///
/// Prefers `$XDG_CONFIG_HOME/anfeeds/config.toml`; falls back to
/// `~/.config/anfeeds/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("anfeeds").join("config.toml")
}

/// Loads the config from [`config_path`]. Never fails; errors are soft.
pub fn load_config() -> Config {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };
    parse_config(&raw).unwrap_or_else(|e| {
        eprintln!("anfeeds: config parse error in {:?}: {}", path, e);
        Config::default()
    })
}

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

/// Loads the configured catalog, or the built-in one when none is set or the
/// file is unusable.
pub fn load_catalog(config: &Config) -> Catalog {
    let Some(path) = config.catalog_path.as_deref() else {
        return Catalog::default();
    };
    match read_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "falling back to built-in catalog");
            Catalog::default()
        }
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(Catalog::from_toml_str(&raw)?)
}

/// Installs the global `tracing` subscriber, writing to the log file in
/// `data_dir`. The terminal belongs to the TUI, so nothing is logged there.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(std::io::Error::other)
}
