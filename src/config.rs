use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env::{self, VarError};

mod logging;
mod migration;
mod server;

pub use logging::{LogFormat, LoggingConfig};
pub use migration::MigrationConfig;
pub use server::ServerConfig;

pub const DEFAULT_MIGRATE_COMMAND: &str = "python manage.py migrate";
pub const DEFAULT_SERVER_PROGRAM: &str = "gunicorn";
pub const DEFAULT_SERVER_APP: &str = "config.asgi:application";
pub const DEFAULT_WORKER_CLASS: &str = "uvicorn.workers.UvicornWorker";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub migration: MigrationConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        check_dotenv(dotenvy::dotenv())?;

        Self::try_from_lookup(env_var)
    }

    /// Load configuration through an infallible variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::try_from_lookup(|key| Ok(lookup(key)))
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// A variable that is present but blank or unreadable is an error, never
    /// a silent fallback to the default.
    pub fn try_from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> AppResult<Option<String>>,
    {
        let var_or = |key: &str, default: &str| -> AppResult<String> {
            match lookup(key)? {
                Some(value) if value.trim().is_empty() => Err(AppError::Configuration(format!(
                    "{} is set but empty",
                    key
                ))),
                Some(value) => Ok(value.trim().to_string()),
                None => Ok(default.to_string()),
            }
        };

        let migrate_command = var_or("MIGRATE_COMMAND", DEFAULT_MIGRATE_COMMAND)?;
        let migration =
            MigrationConfig::from_command_line(&migrate_command).map_err(AppError::Configuration)?;

        let server = ServerConfig {
            program: var_or("SERVER_PROGRAM", DEFAULT_SERVER_PROGRAM)?,
            app: var_or("SERVER_APP", DEFAULT_SERVER_APP)?,
            worker_class: var_or("SERVER_WORKER_CLASS", DEFAULT_WORKER_CLASS)?,
        };

        let format = var_or("LOG_FORMAT", "text")?
            .parse()
            .map_err(AppError::Configuration)?;

        let config = Config {
            migration,
            server,
            logging: LoggingConfig { format },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.migration.validate().map_err(AppError::Configuration)?;
        self.server.validate().map_err(AppError::Configuration)?;

        Ok(())
    }
}

/// Read one environment variable; only an absent variable counts as unset.
pub fn env_var(key: &str) -> AppResult<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(AppError::Configuration(format!(
            "{} is not valid UTF-8",
            key
        ))),
    }
}

/// A missing `.env` file is fine; one that exists but cannot be read or
/// parsed is not.
pub fn check_dotenv<T>(result: Result<T, dotenvy::Error>) -> AppResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(AppError::Configuration(format!("Invalid .env file: {}", e))),
    }
}
