//! Application settings loading from config.toml
//!
//! Every section is optional and falls back to defaults, so the server starts with
//! no config file at all. A few values can be overridden from the environment
//! (after `.env` has been loaded): `PORT`, `ADMIN_USERNAME` and `ADMIN_PASSWORD`.
//! The admin password is only ever read from the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Password seeded for the admin account when `ADMIN_PASSWORD` is not set
pub const FALLBACK_ADMIN_PASSWORD: &str = "rawaj123";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings
    pub server: ServerConfig,
    /// Upload and static file locations
    pub storage: StorageConfig,
    /// Response behavior
    pub http: HttpConfig,
    /// Admin session lifetime
    pub session: SessionConfig,
    /// Seeded admin account
    pub admin: AdminConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Directory holding `index.html`, `admin.html` and their assets
    pub static_dir: PathBuf,
    /// Request body ceiling in bytes; `0` disables the explicit limit
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

/// `[http]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Send no-cache headers on every response
    pub disable_cache: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            disable_cache: true,
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds of inactivity after which a login expires
    pub idle_timeout_secs: u64,
}

impl SessionConfig {
    /// Inactivity window as a `Duration`
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 30 * 60,
        }
    }
}

/// `[admin]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Username of the seeded admin
    pub username: String,
    /// bcrypt work factor used when seeding
    pub bcrypt_cost: u32,
    /// Seed password, filled from `ADMIN_PASSWORD`
    #[serde(skip)]
    pub password: Option<String>,
}

impl AdminConfig {
    /// Password to seed, falling back to [`FALLBACK_ADMIN_PASSWORD`].
    #[must_use]
    pub fn seed_password(&self) -> &str {
        self.password.as_deref().unwrap_or(FALLBACK_ADMIN_PASSWORD)
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            password: None,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Applies environment overrides on top of file settings.
///
/// `lookup` abstracts variable access so tests do not touch the process environment.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port.trim().parse().map_err(|e| Error::Config {
            message: format!("PORT is not a valid port number: {e}"),
        })?;
    }
    if let Some(username) = lookup("ADMIN_USERNAME").filter(|u| !u.trim().is_empty()) {
        config.admin.username = username;
    }
    if let Some(password) = lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
        config.admin.password = Some(password);
    }
    Ok(config)
}

/// Loads the full application configuration.
///
/// Reads `CONFIG_PATH` (default `config.toml`) when it exists, otherwise starts from
/// defaults, then applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let file_config = if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {path}");
        config
    } else {
        info!("No configuration file at {path}, using defaults");
        AppConfig::default()
    };

    let config = apply_env_overrides(file_config, |key| std::env::var(key).ok())?;
    if config.admin.password.is_none() {
        warn!("ADMIN_PASSWORD not set; the admin account will be seeded with the fallback password");
    }
    Ok(config)
}
