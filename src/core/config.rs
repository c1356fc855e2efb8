//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.redis-tui/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub address: Option<String>,
    pub retry_delay_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BrowserConfig {
    pub scan_pattern: Option<String>,
    pub scan_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:6379";
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_SCAN_PATTERN: &str = "*";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_LOG_FILE: &str = "redis-tui.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub address: String,
    pub retry_delay: Duration,
    pub scan_pattern: String,
    /// COUNT hint for SCAN; `None` lets the server pick.
    pub scan_count: Option<u32>,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.redis-tui/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".redis-tui").join("config.toml"))
}

/// Load config from `~/.redis-tui/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ClientConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ClientConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ClientConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# redis-tui Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [connection]
# address = "127.0.0.1:6379"         # Or REDIS_TUI_ADDRESS, or --address
# retry_delay_secs = 2               # Fixed delay between connect attempts

# [browser]
# scan_pattern = "*"                 # Or REDIS_TUI_SCAN_PATTERN
# scan_count = 100                   # COUNT hint per SCAN page

# [general]
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"
# log_file = "redis-tui.log"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_address` is the `--address` flag (None = not specified).
pub fn resolve(config: &ClientConfig, cli_address: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_address, |key| std::env::var(key).ok())
}

/// Resolution with an injectable environment lookup.
fn resolve_with_env(
    config: &ClientConfig,
    cli_address: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Address: CLI → env → config → default
    let address = cli_address
        .map(|s| s.to_string())
        .or_else(|| env("REDIS_TUI_ADDRESS"))
        .or_else(|| config.connection.address.clone())
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    // Scan pattern: env → config → default
    let scan_pattern = env("REDIS_TUI_SCAN_PATTERN")
        .or_else(|| config.browser.scan_pattern.clone())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_SCAN_PATTERN.to_string());

    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    // A zero delay would turn reconnecting into a busy loop
    let retry_delay_secs = match config.connection.retry_delay_secs {
        Some(0) => {
            warn!(
                "retry_delay_secs must be at least 1, using {}",
                DEFAULT_RETRY_DELAY_SECS
            );
            DEFAULT_RETRY_DELAY_SECS
        }
        Some(secs) => secs,
        None => DEFAULT_RETRY_DELAY_SECS,
    };

    ResolvedConfig {
        address,
        retry_delay: Duration::from_secs(retry_delay_secs),
        scan_pattern,
        scan_count: config.browser.scan_count.filter(|n| *n > 0),
        log_level,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .as_deref()
                .unwrap_or(DEFAULT_LOG_FILE),
        ),
    }
}
