//! Container start sequence.
//!
//! This module contains the `start` function which handles:
//! - The schema consistency gate
//! - Worker pool sizing
//! - Hand-off to the application server
//!
//! The steps run strictly in that order on the calling task. Any failure
//! aborts the remaining steps; there is no retry and no partial start.

use crate::config::{Config, ServerConfig};
use crate::error::AppResult;
use crate::launcher::{ExecLauncher, LaunchPlan, Launcher};
use crate::migrate::{CommandMigrator, Migrator};
use crate::sizer::{size_workers, HostTopology, SystemTopology};
use std::convert::Infallible;
use tracing::info;

/// Run the full start sequence against the real host.
///
/// # Errors
///
/// This function returns only on failure:
/// - `MigrationFailure` / `MigrationSpawn` when the gate does not pass
/// - `LaunchFailure` when the server cannot be executed
pub async fn start(config: Config) -> AppResult<Infallible> {
    let migrator = CommandMigrator::new(&config.migration);

    run_sequence(&migrator, &SystemTopology, &config.server, &ExecLauncher).await
}

/// Resolve the launch plan for this host without running anything.
pub fn prepare_launch<T>(topology: &T, target: &ServerConfig) -> LaunchPlan
where
    T: HostTopology + ?Sized,
{
    let deployment = size_workers(topology);
    LaunchPlan::new(target, deployment)
}

/// Gate, size, hand off.
///
/// The topology is not consulted and no launch plan exists until the
/// migrator has succeeded.
pub async fn run_sequence<M, T, L>(
    migrator: &M,
    topology: &T,
    target: &ServerConfig,
    launcher: &L,
) -> AppResult<Infallible>
where
    M: Migrator + ?Sized,
    T: HostTopology + ?Sized,
    L: Launcher + ?Sized,
{
    info!("Starting bootstrap sequence...");

    migrator.migrate().await?;

    let plan = prepare_launch(topology, target);

    launcher.hand_off(plan).await
}
