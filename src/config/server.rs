use serde::{Deserialize, Serialize};

/// Application server hand-off target
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server executable that replaces this process (e.g., "gunicorn")
    pub program: String,

    /// Application module path served by the workers (e.g., "config.asgi:application")
    pub app: String,

    /// ASGI-compatible worker class
    pub worker_class: String,
}

impl ServerConfig {
    /// Validate server configuration values
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("SERVER_PROGRAM", &self.program),
            ("SERVER_APP", &self.app),
            ("SERVER_WORKER_CLASS", &self.worker_class),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(format!("{} must be a single token", name));
            }
        }

        Ok(())
    }
}
