//! Server launch plan and process hand-off.

use crate::config::ServerConfig;
use crate::deployment::DeploymentConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use tracing::info;

/// Complete command line for the application server.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub deployment: DeploymentConfig,
}

impl LaunchPlan {
    /// Assemble the server command line, taking ownership of the deployment
    pub fn new(target: &ServerConfig, deployment: DeploymentConfig) -> Self {
        let args = vec![
            target.app.clone(),
            "--bind".to_string(),
            deployment.bind_address().to_string(),
            "--workers".to_string(),
            deployment.worker_count().to_string(),
            "--worker-class".to_string(),
            target.worker_class.clone(),
            "--timeout".to_string(),
            deployment.request_timeout_seconds().to_string(),
            "--keep-alive".to_string(),
            deployment.keep_alive_seconds().to_string(),
            "--log-level".to_string(),
            deployment.log_level().to_string(),
        ];

        Self {
            program: target.program.clone(),
            args,
            deployment,
        }
    }

    /// Value following `flag` on the command line, if present
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Transfers control of the process to the application server.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Start the server described by `plan`.
    ///
    /// Never returns on success; the only observable outcome is an error.
    async fn hand_off(&self, plan: LaunchPlan) -> AppResult<Infallible>;
}

/// Launcher that replaces the current process image with the server.
///
/// On Unix this is a real `exec`: the server keeps this PID, its signal
/// dispositions and standard streams, and nothing remains above it. Other
/// platforms spawn the server, wait for it while it shares the console's
/// interrupts, and exit with its status.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

#[async_trait]
impl Launcher for ExecLauncher {
    #[cfg(unix)]
    async fn hand_off(&self, plan: LaunchPlan) -> AppResult<Infallible> {
        use std::os::unix::process::CommandExt;

        info!(
            program = %plan.program,
            workers = plan.deployment.worker_count(),
            "Handing off to server: {}",
            plan
        );

        let source = std::process::Command::new(&plan.program)
            .args(&plan.args)
            .exec();

        Err(AppError::LaunchFailure {
            program: plan.program,
            source,
        })
    }

    #[cfg(not(unix))]
    async fn hand_off(&self, plan: LaunchPlan) -> AppResult<Infallible> {
        use crate::util::exit_status_code;
        use tracing::warn;

        info!(
            program = %plan.program,
            workers = plan.deployment.worker_count(),
            "Starting server: {}",
            plan
        );

        let launch_failure = |source| AppError::LaunchFailure {
            program: plan.program.clone(),
            source,
        };

        let mut child = tokio::process::Command::new(&plan.program)
            .args(&plan.args)
            .spawn()
            .map_err(launch_failure)?;

        // The child shares our console, so it receives interrupts directly;
        // we only keep waiting for it to exit.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => info!("Interrupt received, waiting for server to exit"),
                    Err(e) => {
                        warn!("Failed to listen for interrupts: {}", e);
                        break child.wait().await;
                    }
                },
            }
        }
        .map_err(launch_failure)?;

        std::process::exit(exit_status_code(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_SERVER_APP, DEFAULT_SERVER_PROGRAM, DEFAULT_WORKER_CLASS};

    fn target() -> ServerConfig {
        ServerConfig {
            program: DEFAULT_SERVER_PROGRAM.to_string(),
            app: DEFAULT_SERVER_APP.to_string(),
            worker_class: DEFAULT_WORKER_CLASS.to_string(),
        }
    }

    #[test]
    fn test_plan_command_line() {
        let plan = LaunchPlan::new(&target(), DeploymentConfig::for_cores(4));

        assert_eq!(
            plan.to_string(),
            "gunicorn config.asgi:application --bind 0.0.0.0:8000 --workers 9 \
             --worker-class uvicorn.workers.UvicornWorker --timeout 300 \
             --keep-alive 65 --log-level info"
        );
    }

    #[test]
    fn test_plan_carries_sized_worker_count() {
        for (cores, workers) in [(0usize, "1"), (1, "3"), (4, "9"), (32, "65")] {
            let plan = LaunchPlan::new(&target(), DeploymentConfig::for_cores(cores));
            assert_eq!(plan.arg_value("--workers"), Some(workers));
            assert_eq!(plan.arg_value("--bind"), Some("0.0.0.0:8000"));
            assert_eq!(plan.arg_value("--timeout"), Some("300"));
            assert_eq!(plan.arg_value("--keep-alive"), Some("65"));
            assert_eq!(plan.arg_value("--log-level"), Some("info"));
        }
    }

    #[test]
    fn test_plan_serializes_deployment() {
        let plan = LaunchPlan::new(&target(), DeploymentConfig::for_cores(2));
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["program"], "gunicorn");
        assert_eq!(json["deployment"]["core_count"], 2);
        assert_eq!(json["deployment"]["worker_count"], 5);
        assert_eq!(json["deployment"]["bind_address"], "0.0.0.0:8000");
    }

    #[test]
    fn test_arg_value_missing_flag() {
        let plan = LaunchPlan::new(&target(), DeploymentConfig::for_cores(1));
        assert_eq!(plan.arg_value("--reload"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_of_missing_program_fails() {
        let mut target = target();
        target.program = "/nonexistent/gunicorn".to_string();
        let plan = LaunchPlan::new(&target, DeploymentConfig::for_cores(1));

        let err = ExecLauncher.hand_off(plan).await.unwrap_err();
        assert!(matches!(err, AppError::LaunchFailure { .. }));
        assert_eq!(err.exit_code(), 127);
    }
}
