use serde::Deserialize;

/// Schema migration command configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationConfig {
    /// Executable invoked for the consistency gate (e.g., "python")
    pub program: String,

    /// Arguments passed to the executable, exactly as configured
    pub args: Vec<String>,
}

impl MigrationConfig {
    /// Split a whitespace separated command line into program and arguments
    pub fn from_command_line(command: &str) -> Result<Self, String> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| "MIGRATE_COMMAND must name a program".to_string())?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Validate migration configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("MIGRATE_COMMAND must name a program".to_string());
        }

        Ok(())
    }
}
