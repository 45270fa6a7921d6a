use std::io;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Migration command exited with status {status}")]
    MigrationFailure { status: i32 },

    #[error("Failed to start migration command `{program}`: {source}")]
    MigrationSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to hand off to server `{program}`: {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit status that reports this error to the container runtime.
    ///
    /// Statuses reported by the migration tool pass through untouched. Spawn
    /// and exec failures follow the shell convention: 127 when the program
    /// does not exist, 126 when it cannot be executed.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::MigrationFailure { status } => *status,
            AppError::MigrationSpawn { source, .. } | AppError::LaunchFailure { source, .. } => {
                spawn_failure_status(source)
            }
            AppError::Configuration(_) | AppError::Serialization(_) => 1,
        }
    }
}

fn spawn_failure_status(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 1,
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;
