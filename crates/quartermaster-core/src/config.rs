//! Configuration resolution for Quartermaster.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/quartermaster/settings.json)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables
//! 5. CLI arguments (highest priority, applied by the binary)
//!
//! The token signing secret is deliberately absent: it only ever arrives
//! through the environment or the command line.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default credential validity: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Complete Quartermaster configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub database_path: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_path: None,
            cors_origins: vec!["http://localhost:3000".to_string()],
            log_level: "info".to_string(),
        }
    }
}

/// Credential issuance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

/// Keys present in one settings file. Absent keys leave earlier layers
/// untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverlay {
    server: ServerOverlay,
    auth: AuthOverlay,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerOverlay {
    addr: Option<SocketAddr>,
    database_path: Option<PathBuf>,
    cors_origins: Option<Vec<String>>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthOverlay {
    token_ttl_secs: Option<i64>,
}

/// Load configuration with hierarchical resolution.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let global = global_config_path().filter(|p| p.exists());
    let files = global.as_deref().into_iter().chain(explicit);
    resolve(files, |key| std::env::var(key).ok())
}

/// Layer each file over the defaults in order, then the environment.
fn resolve<'a>(
    files: impl IntoIterator<Item = &'a Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = Config::default();
    for path in files {
        merge_config(&mut config, load_config_file(path)?);
    }
    apply_env_overrides(&mut config, var);
    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Get the default database path.
pub fn database_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("ledger.db"))
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".quartermaster"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/quartermaster"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("quartermaster"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<ConfigOverlay> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: ConfigOverlay) {
    let ServerOverlay {
        addr,
        database_path,
        cors_origins,
        log_level,
    } = overlay.server;
    if let Some(addr) = addr {
        base.server.addr = addr;
    }
    if database_path.is_some() {
        base.server.database_path = database_path;
    }
    if let Some(origins) = cors_origins {
        base.server.cors_origins = origins;
    }
    if let Some(level) = log_level {
        base.server.log_level = level;
    }
    if let Some(ttl) = overlay.auth.token_ttl_secs {
        base.auth.token_ttl_secs = ttl;
    }
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(addr) = var("QUARTERMASTER_ADDR").and_then(|v| v.parse().ok()) {
        config.server.addr = addr;
    }
    if let Some(path) = var("QUARTERMASTER_DB_PATH") {
        config.server.database_path = Some(PathBuf::from(path));
    }
    if let Some(origins) = var("QUARTERMASTER_CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(level) = var("QUARTERMASTER_LOG_LEVEL") {
        config.server.log_level = level;
    }
    if let Some(ttl) = var("QUARTERMASTER_TOKEN_TTL").and_then(|v| v.parse().ok()) {
        config.auth.token_ttl_secs = ttl;
    }
}
