//! Schema consistency gate.
//!
//! The gate runs the application's migration command exactly once and
//! blocks until it finishes. A non-zero exit is fatal and its status is
//! reported unchanged; nothing is retried and no timeout is applied.

use crate::config::MigrationConfig;
use crate::error::{AppError, AppResult};
use crate::util::exit_status_code;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

/// Brings the durable schema in line with the application before it serves.
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Run the migration to completion.
    ///
    /// Returns `AppError::MigrationFailure` carrying the tool's exit status
    /// when the run does not succeed.
    async fn migrate(&self) -> AppResult<()>;
}

/// Migrator backed by an external command such as `python manage.py migrate`.
///
/// The command inherits stdin, stdout and stderr so its diagnostics reach
/// the container log untouched.
#[derive(Debug, Clone)]
pub struct CommandMigrator {
    program: String,
    args: Vec<String>,
}

impl CommandMigrator {
    pub fn new(config: &MigrationConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

#[async_trait]
impl Migrator for CommandMigrator {
    async fn migrate(&self) -> AppResult<()> {
        info!(program = %self.program, args = ?self.args, "Running database migrations...");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .await
            .map_err(|source| AppError::MigrationSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AppError::MigrationFailure {
                status: exit_status_code(status),
            });
        }

        info!("Migrations completed successfully");
        Ok(())
    }
}
