//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from an optional TOML file. Command-line
//! arguments and environment variables override it; compiled defaults fill
//! anything left unset.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. `WERBOARD_ROOT_FOLDER` environment variable
//! 3. TOML `root_folder`
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "WERBOARD_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "werboard.db";

/// Bootstrap configuration as read from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path; defaults to `<root_folder>/werboard.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload request, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Points normalization parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    /// Leaderboard row that anchors 0 points
    #[serde(default = "default_baseline_username")]
    pub baseline_username: String,

    /// Points cap, earned by matching the top-N average
    #[serde(default = "default_max_points")]
    pub max_points: f64,

    /// How many best entries form the top average
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5790
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_baseline_username() -> String {
    "baseline".to_string()
}

fn default_max_points() -> f64 {
    15.0
}

fn default_top_n() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            bind_address: default_bind_address(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline_username: default_baseline_username(),
            max_points: default_max_points(),
            top_n: default_top_n(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.baseline_username.trim().is_empty() {
            return Err(Error::Config("scoring.baseline_username must not be empty".to_string()));
        }
        if !self.max_points.is_finite() || self.max_points <= 0.0 {
            return Err(Error::Config(format!(
                "scoring.max_points must be a positive number, got {}",
                self.max_points
            )));
        }
        if self.top_n == 0 {
            return Err(Error::Config("scoring.top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load from `path`
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// used. A file that exists but cannot be read or parsed is an error.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let toml_str = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&toml_str)?;
        info!("Loaded TOML configuration from {}", path.display());
        Ok(config)
    }
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Combine TOML values with overrides and validate the result
    pub fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let root_folder = resolve_root_folder(
            overrides.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            toml_config.root_folder.as_deref(),
        );

        let database_path = overrides
            .database_path
            .or(toml_config.database_path)
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE));

        if toml_config.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }
        toml_config.scoring.validate()?;

        Ok(Self {
            root_folder,
            database_path,
            bind_address: overrides.bind_address.unwrap_or(toml_config.bind_address),
            port: overrides.port.unwrap_or(toml_config.port),
            max_upload_bytes: toml_config.max_upload_bytes,
            scoring: toml_config.scoring,
            logging: toml_config.logging,
        })
    }
}

/// Resolve the root folder: CLI argument, environment, TOML, then OS default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Default configuration file path for the platform
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("werboard").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("werboard.toml"))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/werboard (or /var/lib/werboard for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("werboard"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/werboard"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/werboard
        dirs::data_dir()
            .map(|d| d.join("werboard"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/werboard"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\werboard
        dirs::data_local_dir()
            .map(|d| d.join("werboard"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\werboard"))
    } else {
        PathBuf::from("./werboard_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5790);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.scoring.baseline_username, "baseline");
        assert_eq!(config.scoring.max_points, 15.0);
        assert_eq!(config.scoring.top_n, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = TomlConfig::parse("port = 8080\n[scoring]\ntop_n = 5\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.scoring.top_n, 5);
        assert_eq!(config.scoring.max_points, 15.0);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_scoring_validation() {
        let mut scoring = ScoringConfig::default();
        assert!(scoring.validate().is_ok());
        scoring.top_n = 0;
        assert!(matches!(scoring.validate(), Err(Error::Config(_))));
        scoring = ScoringConfig {
            max_points: f64::INFINITY,
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
        scoring = ScoringConfig {
            baseline_username: " ".to_string(),
            ..ScoringConfig::default()
        };
        assert!(scoring.validate().is_err());
    }
}
