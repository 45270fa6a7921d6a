//! Launch parameters fixed for every deployment of the server.
//!
//! Everything here except the core count is policy, not configuration: the
//! same image must start the same way on every host, scaled only by the
//! number of logical CPUs it sees.

use serde::Serialize;

/// Address the server binds inside the container.
pub const BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Seconds a worker may spend on one request before it is recycled.
pub const REQUEST_TIMEOUT_SECONDS: u64 = 300;

/// Seconds an idle keep-alive connection is held open.
pub const KEEP_ALIVE_SECONDS: u64 = 65;

/// Server log verbosity.
pub const LOG_LEVEL: &str = "info";

/// Worker pool size for a host with `core_count` logical CPUs.
///
/// `2 * core_count + 1`. The `+ 1` keeps at least one worker even when the
/// host reports zero cores.
pub fn worker_count(core_count: usize) -> usize {
    core_count.saturating_mul(2).saturating_add(1)
}

/// Launch parameters resolved once per container start.
///
/// Built by the worker sizer and moved into the launch plan; there is no
/// way to change a field after construction.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentConfig {
    core_count: usize,
    worker_count: usize,
    bind_address: &'static str,
    request_timeout_seconds: u64,
    keep_alive_seconds: u64,
    log_level: &'static str,
}

impl DeploymentConfig {
    /// Resolve the deployment for a host with the given core count
    pub fn for_cores(core_count: usize) -> Self {
        Self {
            core_count,
            worker_count: worker_count(core_count),
            bind_address: BIND_ADDRESS,
            request_timeout_seconds: REQUEST_TIMEOUT_SECONDS,
            keep_alive_seconds: KEEP_ALIVE_SECONDS,
            log_level: LOG_LEVEL,
        }
    }

    pub fn core_count(&self) -> usize {
        self.core_count
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn bind_address(&self) -> &'static str {
        self.bind_address
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }

    pub fn keep_alive_seconds(&self) -> u64 {
        self.keep_alive_seconds
    }

    pub fn log_level(&self) -> &'static str {
        self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_formula() {
        for cores in 0..=256usize {
            assert_eq!(worker_count(cores), 2 * cores + 1);
            assert!(worker_count(cores) >= 1);
        }
    }

    #[test]
    fn test_worker_count_scenarios() {
        assert_eq!(worker_count(1), 3);
        assert_eq!(worker_count(4), 9);
        assert_eq!(worker_count(0), 1);
    }

    #[test]
    fn test_worker_count_saturates() {
        assert_eq!(worker_count(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_fixed_parameters_ignore_core_count() {
        for cores in [0usize, 1, 4, 64] {
            let deployment = DeploymentConfig::for_cores(cores);
            assert_eq!(deployment.core_count(), cores);
            assert_eq!(deployment.bind_address(), "0.0.0.0:8000");
            assert_eq!(deployment.request_timeout_seconds(), 300);
            assert_eq!(deployment.keep_alive_seconds(), 65);
            assert_eq!(deployment.log_level(), "info");
        }
    }
}
