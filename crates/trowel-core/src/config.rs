//! Layered configuration.
//!
//! Values resolve in this order, later layers winning:
//!
//! 1. compiled-in defaults ([`TrowelConfig::default`])
//! 2. a TOML file (`--config PATH`, else `<config dir>/trowel/config.toml`
//!    when it exists)
//! 3. `TROWEL_<SECTION>_<KEY>` environment variables
//!
//! ```rust
//! use trowel_core::config::TrowelConfig;
//!
//! let mut config = TrowelConfig::default();
//! config
//!     .apply_env_overrides([("TROWEL_SERVER_PORT", "9000")])
//!     .unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{Error, Result};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "TROWEL";

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "trowel";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrowelConfig {
    /// HTTP server
    pub server: ServerConfig,
    /// SQLite database
    pub database: DatabaseConfig,
    /// Log output
    pub logging: LoggingConfig,
    /// Planner defaults and limits
    pub planning: PlanningConfig,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Relaxed CORS and verbose logging
    pub debug: bool,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Directory served under `/static`; `index.html` is served at `/`
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            request_timeout_secs: 30,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[database]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://data/robot.db` or `sqlite::memory:`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// How long a writer waits on a locked database
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/database/robot_control.db".to_string(),
            max_connections: 20,
            busy_timeout_secs: 30,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Optional file receiving a copy of the log
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// `[planning]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Default tool width in centimetres
    pub robot_width_cm: f64,
    /// Default overlap between passes, percent
    pub overlap_percentage: f64,
    /// Default sampling step in centimetres
    pub resolution_cm: f64,
    /// Upper bound on points in one trajectory
    pub max_trajectory_points: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            robot_width_cm: 10.0,
            overlap_percentage: 20.0,
            resolution_cm: 1.0,
            max_trajectory_points: 100_000,
        }
    }
}

impl PlanningConfig {
    /// Default tool width in metres.
    pub fn robot_width_m(&self) -> f64 {
        self.robot_width_cm / 100.0
    }

    /// Default sampling step in metres.
    pub fn resolution_m(&self) -> f64 {
        self.resolution_cm / 100.0
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}: cannot parse '{value}'")))
}

impl TrowelConfig {
    /// Reads and parses a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Applies `TROWEL_*` assignments; unrelated keys are ignored.
    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(name) = key
                .strip_prefix(ENV_PREFIX)
                .and_then(|rest| rest.strip_prefix('_'))
            else {
                continue;
            };
            match name {
                "SERVER_HOST" => self.server.host = value.to_string(),
                "SERVER_PORT" => self.server.port = parse_env(key, value)?,
                "SERVER_DEBUG" => self.server.debug = parse_env(key, value)?,
                "SERVER_REQUEST_TIMEOUT_SECS" => {
                    self.server.request_timeout_secs = parse_env(key, value)?
                }
                "SERVER_STATIC_DIR" => self.server.static_dir = PathBuf::from(value),
                "DATABASE_URL" => self.database.url = value.to_string(),
                "DATABASE_MAX_CONNECTIONS" => {
                    self.database.max_connections = parse_env(key, value)?
                }
                "DATABASE_BUSY_TIMEOUT_SECS" => {
                    self.database.busy_timeout_secs = parse_env(key, value)?
                }
                "LOGGING_LEVEL" => self.logging.level = value.to_string(),
                "LOGGING_FILE" => {
                    self.logging.file = (!value.is_empty()).then(|| PathBuf::from(value))
                }
                "PLANNING_ROBOT_WIDTH_CM" => {
                    self.planning.robot_width_cm = parse_env(key, value)?
                }
                "PLANNING_OVERLAP_PERCENTAGE" => {
                    self.planning.overlap_percentage = parse_env(key, value)?
                }
                "PLANNING_RESOLUTION_CM" => self.planning.resolution_cm = parse_env(key, value)?,
                "PLANNING_MAX_TRAJECTORY_POINTS" => {
                    self.planning.max_trajectory_points = parse_env(key, value)?
                }
                other => tracing::debug!(key = %other, "ignoring unknown TROWEL_ variable"),
            }
        }
        Ok(())
    }
}

impl TrowelConfig {
    /// Platform default location of the config file.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Explicit path if given, otherwise the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit.map(PathBuf::from).or_else(Self::default_config_path)
    }

    /// Loads defaults, then the file (if any), then environment overrides.
    /// An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env_overrides(std::env::vars())?;
        Ok(config)
    }

    /// Pretty TOML rendering.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Every setting as an environment variable assignment.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let var = |name: &str, value: String| (format!("{ENV_PREFIX}_{name}"), value);
        let mut vars = vec![
            var("SERVER_HOST", self.server.host.clone()),
            var("SERVER_PORT", self.server.port.to_string()),
            var("SERVER_DEBUG", self.server.debug.to_string()),
            var(
                "SERVER_REQUEST_TIMEOUT_SECS",
                self.server.request_timeout_secs.to_string(),
            ),
            var(
                "SERVER_STATIC_DIR",
                self.server.static_dir.display().to_string(),
            ),
            var("DATABASE_URL", self.database.url.clone()),
            var(
                "DATABASE_MAX_CONNECTIONS",
                self.database.max_connections.to_string(),
            ),
            var(
                "DATABASE_BUSY_TIMEOUT_SECS",
                self.database.busy_timeout_secs.to_string(),
            ),
            var("LOGGING_LEVEL", self.logging.level.clone()),
        ];
        if let Some(file) = &self.logging.file {
            vars.push(var("LOGGING_FILE", file.display().to_string()));
        }
        vars.extend([
            var(
                "PLANNING_ROBOT_WIDTH_CM",
                self.planning.robot_width_cm.to_string(),
            ),
            var(
                "PLANNING_OVERLAP_PERCENTAGE",
                self.planning.overlap_percentage.to_string(),
            ),
            var(
                "PLANNING_RESOLUTION_CM",
                self.planning.resolution_cm.to_string(),
            ),
            var(
                "PLANNING_MAX_TRAJECTORY_POINTS",
                self.planning.max_trajectory_points.to_string(),
            ),
        ]);
        Ok(vars)
    }
}
