//! Administrative command handlers.
//!
//! This module contains CLI command handlers for running single steps of
//! the start sequence on their own: the migration gate, or the launch
//! plan the host would get.

use crate::bootstrap::prepare_launch;
use crate::config::Config;
use crate::error::AppResult;
use crate::migrate::{CommandMigrator, Migrator};
use crate::sizer::SystemTopology;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run only the database migration gate
    Migrate,

    /// Print the server command line this host would launch
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => migrate(config).await,
        AdminCommands::Plan { json } => plan(config, json),
    }
}

/// Run database migrations.
async fn migrate(config: Config) -> AppResult<()> {
    let migrator = CommandMigrator::new(&config.migration);
    migrator.migrate().await
}

/// Display the launch plan.
fn plan(config: Config, json: bool) -> AppResult<()> {
    let plan = prepare_launch(&SystemTopology, &config.server);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    info!("Resolved launch plan");
    println!("\n=== Launch Plan ===");
    println!("Logical cores:   {}", plan.deployment.core_count());
    println!("Workers:         {}", plan.deployment.worker_count());
    println!("Bind address:    {}", plan.deployment.bind_address());
    println!("Timeout (s):     {}", plan.deployment.request_timeout_seconds());
    println!("Keep-alive (s):  {}", plan.deployment.keep_alive_seconds());
    println!("Log level:       {}", plan.deployment.log_level());
    println!("Command:         {}", plan);
    println!();

    Ok(())
}
