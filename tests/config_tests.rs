//! Configuration loading tests.
//!
//! These tests feed `.env` style files through the same lookup the
//! process environment uses, without touching the real environment.

use entrypoint::config::{check_dotenv, Config, LogFormat};
use entrypoint::error::AppError;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn load_env_file(contents: &str) -> Result<Config, AppError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, contents).unwrap();

    let vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
        .unwrap()
        .map(|item| item.unwrap())
        .collect();

    Config::from_lookup(|key| vars.get(key).cloned())
}

mod env_file_tests {
    use super::*;

    #[test]
    fn test_empty_env_file_uses_defaults() {
        let config = load_env_file("").unwrap();

        assert_eq!(config.migration.program, "python");
        assert_eq!(config.migration.args, vec!["manage.py", "migrate"]);
        assert_eq!(config.server.program, "gunicorn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_env_file_overrides() {
        let config = load_env_file(
            "# deployment overrides\n\
             MIGRATE_COMMAND=\"/app/.venv/bin/python manage.py migrate\"\n\
             SERVER_PROGRAM=/app/.venv/bin/gunicorn\n\
             LOG_FORMAT=json\n",
        )
        .unwrap();

        assert_eq!(config.migration.program, "/app/.venv/bin/python");
        assert_eq!(config.migration.args, vec!["manage.py", "migrate"]);
        assert_eq!(config.server.program, "/app/.venv/bin/gunicorn");
        assert_eq!(config.server.app, "config.asgi:application");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_blank_value_in_env_file_is_fatal() {
        let err = load_env_file("MIGRATE_COMMAND=\n").unwrap_err();

        assert!(matches!(err, AppError::Configuration(ref msg) if msg.contains("MIGRATE_COMMAND")));
        assert_eq!(err.exit_code(), 1);
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_server_program_with_arguments_rejected() {
        let err = load_env_file("SERVER_PROGRAM=\"gunicorn --reload\"\n").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = load_env_file("LOG_FORMAT=pretty\n").unwrap_err();
        assert!(matches!(err, AppError::Configuration(ref msg) if msg.contains("LOG_FORMAT")));
    }
}

mod dotenv_file_tests {
    use super::*;

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let result = dotenvy::from_path_iter(dir.path().join(".env"));

        assert!(check_dotenv(result).is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "SERVER_PROGRAM=\"unterminated\n").unwrap();

        let result = dotenvy::from_path_iter(&path)
            .and_then(|iter| iter.collect::<Result<Vec<(String, String)>, _>>());
        let err = check_dotenv(result).unwrap_err();

        assert!(matches!(err, AppError::Configuration(ref msg) if msg.contains(".env")));
        assert_eq!(err.exit_code(), 1);
    }
}
