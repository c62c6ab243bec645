use std::path::PathBuf;

use tracing::warn;

const DEFAULT_DATABASE_PATH: &str = "rollbook.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOGS_DIR: &str = "logs";

/// Server configuration, read once from the process environment at startup
/// and never mutated afterward.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the SQLite database file (`DATABASE_PATH`).
    pub database_path: PathBuf,
    /// HTTP listen port (`PORT`); the server binds `0.0.0.0`.
    pub port: u16,
    /// Directory for rolling log files (`ROLLBOOK_LOGS`).
    pub logs_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            port: DEFAULT_PORT,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let port = match std::env::var("PORT") {
            Ok(raw) => parse_port(&raw),
            Err(_) => defaults.port,
        };

        let logs_dir = std::env::var("ROLLBOOK_LOGS")
            .map(PathBuf::from)
            .unwrap_or(defaults.logs_dir);

        Self {
            database_path,
            port,
            logs_dir,
        }
    }

    /// Socket address string the server binds.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_port(raw: &str) -> u16 {
    raw.parse().unwrap_or_else(|_| {
        warn!("Ignoring unparseable PORT value {raw:?}, using {DEFAULT_PORT}");
        DEFAULT_PORT
    })
}
