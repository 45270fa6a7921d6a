use clap::{Parser, Subcommand};
use entrypoint::admin::{self, AdminCommands};
use entrypoint::bootstrap;
use entrypoint::config::{Config, LogFormat, LoggingConfig};
use entrypoint::error::{AppError, AppResult};
use std::io::{self, IsTerminal};
use std::process;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// entrypoint - migrate, size the worker pool, hand off to the server
#[derive(Parser, Debug)]
#[command(name = "entrypoint")]
#[command(version)]
#[command(about = "Container entrypoint for the ASGI application server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Migrate, then replace this process with the server (default)
    Start,

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("entrypoint: {}", e);
            process::exit(e.exit_code());
        }
    };

    init_tracing(&config.logging);

    let result: AppResult<()> = match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => bootstrap::start(config).await.map(|never| match never {}),
        Commands::Admin { admin_command } => admin::run(config, admin_command).await,
    };

    if let Err(e) = result {
        // The migration tool has already reported its own failure.
        if !matches!(e, AppError::MigrationFailure { .. }) {
            tracing::error!(exit_code = e.exit_code(), "{}", e);
        }
        process::exit(e.exit_code());
    }
}

/// Log to stderr so the server's stdout stays untouched.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}
