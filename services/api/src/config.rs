//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The only command-line option is `--port`.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the schedule document is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// A JSON file on disk, rewritten after every change.
    File,
    /// Process memory only; the schedule is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "'{}' is not a storage backend (use 'file' or 'memory')",
                other
            )),
        }
    }
}

/// Command-line arguments for the `api` binary.
#[derive(Parser, Debug, Default)]
#[command(name = "api", about = "Youth Conference Schedule API")]
pub struct Cli {
    /// Port to run the server on. The PORT environment variable takes precedence.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub schedule_file: PathBuf,
    pub storage: StorageBackend,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env(cli: &Cli) -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok(), cli)
    }

    /// Builds the configuration from any key/value source plus the parsed
    /// command line.
    ///
    /// The listening port comes from `PORT`, then `--port`, then the port in
    /// `BIND_ADDRESS`.
    pub fn from_lookup<F>(lookup: F, cli: &Cli) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let mut bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        if let Some(port) = cli.port {
            bind_address.set_port(port);
        }
        if let Some(port_str) = lookup("PORT") {
            let port = port_str.parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue("PORT".to_string(), e.to_string())
            })?;
            bind_address.set_port(port);
        }

        // --- Storage Settings ---
        let schedule_file = lookup("SCHEDULE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/schedule.json"));

        let storage = lookup("SCHEDULE_STORAGE")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("SCHEDULE_STORAGE".to_string(), e))?
            .unwrap_or(StorageBackend::File);

        // --- Logging ---
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            schedule_file,
            storage,
            log_level,
        })
    }
}
