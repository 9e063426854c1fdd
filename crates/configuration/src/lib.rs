use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LogSettings, Overrides, ServerSettings, Settings};

/// The settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Prefix of environment overrides, e.g. `VGSALES__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "VGSALES";

/// Loads the dashboard configuration.
///
/// Sources are layered from lowest to highest precedence: built-in
/// defaults, the settings file, `VGSALES__*` environment variables, and
/// finally the command-line `overrides`. The default settings file is
/// optional; a file named explicitly with `--config` must exist.
pub fn load_settings(overrides: &Overrides) -> Result<Settings, ConfigError> {
    let file = match &overrides.config {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let builder = defaults()?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?.apply(overrides);
    settings.validate()?;
    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.path", "video_games.db")?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8501_i64)?
        .set_default("log.level", "info")?;
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [database]
            path = "data/sales.duckdb"

            [server]
            port = 9000
            "#,
        );
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Overrides::default()
        };

        let settings = load_settings(&overrides).unwrap();
        assert_eq!(settings.database.path, PathBuf::from("data/sales.duckdb"));
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.log.level, "info");
        assert!(settings.log.directory.is_none());
    }

    #[test]
    fn command_line_overrides_win() {
        let file = write_config("[server]\nport = 9000\n");
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            db: Some(PathBuf::from("other.db")),
            host: Some("0.0.0.0".to_string()),
            port: Some(3000),
        };

        let settings = load_settings(&overrides).unwrap();
        assert_eq!(settings.database.path, PathBuf::from("other.db"));
        assert_eq!(
            settings.server.socket_addr().unwrap().to_string(),
            "0.0.0.0:3000"
        );
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let overrides = Overrides {
            config: Some(PathBuf::from("definitely/not/here.toml")),
            ..Overrides::default()
        };
        assert!(matches!(
            load_settings(&overrides),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn invalid_host_fails_validation() {
        let file = write_config("[server]\nhost = \"not a host\"\n");
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Overrides::default()
        };
        assert!(matches!(
            load_settings(&overrides),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
