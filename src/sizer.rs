//! Worker pool sizing from host topology.

use crate::deployment::DeploymentConfig;
use tracing::info;

/// Source of the host's logical CPU count.
pub trait HostTopology {
    /// Number of logical processing units visible to this process
    fn logical_cores(&self) -> usize;
}

/// Host topology as reported by the operating system.
///
/// Honours CPU affinity masks and cgroup quotas, so a container limited to
/// two CPUs on a 64-core machine reports two.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTopology;

impl HostTopology for SystemTopology {
    fn logical_cores(&self) -> usize {
        num_cpus::get()
    }
}

/// Query the host once and resolve the deployment parameters.
pub fn size_workers<T>(topology: &T) -> DeploymentConfig
where
    T: HostTopology + ?Sized,
{
    let core_count = topology.logical_cores();
    let deployment = DeploymentConfig::for_cores(core_count);

    info!(
        core_count,
        worker_count = deployment.worker_count(),
        "Sized worker pool"
    );

    deployment
}
