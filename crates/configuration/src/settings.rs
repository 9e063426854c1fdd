use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

/// Where the sales database lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the DuckDB file. It is always opened read-only.
    pub path: PathBuf,
}

/// The HTTP listener of the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default filter directive, e.g. "info" or "web_server=debug".
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Command-line overrides applied on top of the loaded settings.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Path to a TOML settings file (default: dashboard.toml, optional).
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub config: Option<PathBuf>,

    /// Path to the DuckDB sales database.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub db: Option<PathBuf>,

    /// Address the web server binds to.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub host: Option<String>,

    /// Port the web server listens on.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub port: Option<u16>,
}

impl Settings {
    /// Applies command-line overrides; only fields that were given replace
    /// the loaded values.
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(db) = &overrides.db {
            self.database.path = db.clone();
        }
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "log.level must not be empty".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "server address '{}:{}' is invalid: {e}",
                    self.host, self.port
                ))
            })
    }
}
