//! Layered runtime configuration for taskboard processes.
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attributes)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults
//!
//! The database URL has no compiled default.

use std::path::{Path, PathBuf};

/// Default r2d2 pool size.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// No database URL was supplied by any layer.
    #[error("database URL is not configured; set TASKBOARD_DATABASE_URL or [database].url")]
    MissingDatabaseUrl,

    /// The pool size resolved to zero.
    #[error("database pool size must be at least 1")]
    InvalidPoolSize,
}

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    database: DatabaseFileConfig,
    logging: LoggingFileConfig,
}

/// `[database]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DatabaseFileConfig {
    url: Option<String>,
    pool_size: Option<u32>,
}

/// `[logging]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LoggingFileConfig {
    level: Option<String>,
}

/// Command-line arguments shared by taskboard binaries.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct TaskboardCliArgs {
    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "TASKBOARD_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKBOARD_POOL_SIZE", global = true)]
    pub pool_size: Option<u32>,

    /// Log filter directive (trace, debug, info, warn, error).
    #[arg(long, env = "TASKBOARD_LOG", global = true)]
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskboardConfig {
    database_url: Option<String>,
    pool_size: u32,
    log_level: String,
}

impl Default for TaskboardConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl TaskboardConfig {
    /// Loads configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// An explicit `--config` path must exist. Without one, the default path
    /// is tried and a missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when the resolved pool size is zero.
    pub fn load(cli: &TaskboardCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        if config.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        Ok(config)
    }

    fn resolve(cli: &TaskboardCliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            database_url: cli
                .database_url
                .clone()
                .or_else(|| file.database.url.clone()),
            pool_size: cli
                .pool_size
                .or(file.database.pool_size)
                .unwrap_or(defaults.pool_size),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| file.logging.level.clone())
                .unwrap_or(defaults.log_level),
        }
    }

    /// Returns the database URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no layer set one.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Returns the connection pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the tracing filter directive.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let default_path = config_dir.join("taskboard").join("config.toml");
    match std::fs::read_to_string(&default_path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile {
            path: default_path,
            source,
        }),
    }
}
