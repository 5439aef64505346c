//! Configuration loader
//!
//! ## Loading Strategy
//! 1. If `BYTE_API_URL` is set, build the configuration from environment
//!    variables (unset optional variables take their defaults)
//! 2. Otherwise probe for a config file (JSON or TOML)
//! 3. With neither, use the built-in defaults
//!
//! ## Environment Variables
//! - `BYTE_API_URL`: API service base URL (selects environment loading)
//! - `BYTE_API_TIMEOUT_SECS`: per-attempt timeout in seconds
//! - `BYTE_API_MAX_ATTEMPTS`: total attempts per call
//! - `BYTE_API_BASE_DELAY_MS`: delay before the first retry
//! - `BYTE_API_MAX_DELAY_MS`: cap for any single delay
//! - `BYTE_API_JITTER`: `none`, `full`, or `equal`
//! - `BYTE_SERVER_HOST` / `BYTE_SERVER_PORT`: API service listener
//! - `BYTE_LOG_LEVEL`: default log filter
//! - `BYTE_LOG_FORMAT`: `json` or `pretty`
//!
//! ## File Locations
//! The loader probes `byte.toml`, `byte.json`, `config.toml`, and
//! `config.json` in the working directory, its parent, and next to the
//! executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use byte_domain::{
    ClientSettings, Config, DomainError, LogFormat, LoggingConfig, Result, ServerSettings,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["byte.toml", "byte.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DomainError::Config` when the selected source is malformed.
pub fn load() -> Result<Config> {
    if std::env::var_os("BYTE_API_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No configuration source found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `BYTE_API_URL` is required; every other variable falls back to its
/// default when unset.
///
/// # Errors
/// Returns `DomainError::Config` if `BYTE_API_URL` is missing or any set
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let client = ClientSettings {
        base_url: env_var("BYTE_API_URL")?,
        timeout_secs: env_parse("BYTE_API_TIMEOUT_SECS", defaults.client.timeout_secs)?,
        max_attempts: env_parse("BYTE_API_MAX_ATTEMPTS", defaults.client.max_attempts)?,
        base_delay_ms: env_parse("BYTE_API_BASE_DELAY_MS", defaults.client.base_delay_ms)?,
        max_delay_ms: env_parse("BYTE_API_MAX_DELAY_MS", defaults.client.max_delay_ms)?,
        jitter: env_or("BYTE_API_JITTER", defaults.client.jitter),
    };
    if client.timeout_secs == 0 {
        return Err(DomainError::Config(
            "Invalid value for BYTE_API_TIMEOUT_SECS: must be greater than zero".to_string(),
        ));
    }

    let server = ServerSettings {
        host: env_or("BYTE_SERVER_HOST", defaults.server.host),
        port: env_parse("BYTE_SERVER_PORT", defaults.server.port)?,
    };

    let format = match std::env::var("BYTE_LOG_FORMAT") {
        Ok(raw) => LogFormat::from_str(&raw).map_err(DomainError::Config)?,
        Err(_) => defaults.logging.format,
    };
    let logging = LoggingConfig { level: env_or("BYTE_LOG_LEVEL", defaults.logging.level), format };

    Ok(Config { client, server, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DomainError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DomainError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DomainError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DomainError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DomainError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `DomainError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DomainError::Config(format!("Missing required environment variable: {key}")))
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `DomainError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        "BYTE_API_URL",
        "BYTE_API_TIMEOUT_SECS",
        "BYTE_API_MAX_ATTEMPTS",
        "BYTE_API_BASE_DELAY_MS",
        "BYTE_API_MAX_DELAY_MS",
        "BYTE_API_JITTER",
        "BYTE_SERVER_HOST",
        "BYTE_SERVER_PORT",
        "BYTE_LOG_LEVEL",
        "BYTE_LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://api:8000");
        std::env::set_var("BYTE_API_TIMEOUT_SECS", "5");
        std::env::set_var("BYTE_API_MAX_ATTEMPTS", "4");
        std::env::set_var("BYTE_API_BASE_DELAY_MS", "250");
        std::env::set_var("BYTE_API_MAX_DELAY_MS", "4000");
        std::env::set_var("BYTE_API_JITTER", "equal");
        std::env::set_var("BYTE_SERVER_HOST", "0.0.0.0");
        std::env::set_var("BYTE_SERVER_PORT", "9000");
        std::env::set_var("BYTE_LOG_LEVEL", "debug");
        std::env::set_var("BYTE_LOG_FORMAT", "json");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.client.base_url, "http://api:8000");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.max_attempts, 4);
        assert_eq!(config.client.base_delay_ms, 250);
        assert_eq!(config.client.max_delay_ms, 4000);
        assert_eq!(config.client.jitter, "equal");
        assert_eq!(config.server.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_env_applies_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://api:8000");
        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.client.max_attempts, 3);
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_from_env_missing_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DomainError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://api:8000");
        std::env::set_var("BYTE_API_MAX_ATTEMPTS", "not-a-number");
        let result = load_from_env();
        clear_env();

        match result {
            Err(DomainError::Config(message)) => assert!(message.contains("BYTE_API_MAX_ATTEMPTS")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_env_zero_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://api:8000");
        std::env::set_var("BYTE_API_TIMEOUT_SECS", "0");
        let result = load_from_env();
        clear_env();

        match result {
            Err(DomainError::Config(message)) => assert!(message.contains("BYTE_API_TIMEOUT_SECS")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_env_invalid_log_format() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://api:8000");
        std::env::set_var("BYTE_LOG_FORMAT", "xml");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "client": {"base_url": "http://json:1", "max_attempts": 2},
            "logging": {"format": "json"}
        }"#;

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.client.base_url, "http://json:1");
        assert_eq!(config.client.max_attempts, 2);
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
            [client]
            base_url = "http://toml:2"
            jitter = "full"

            [server]
            port = 8100
        "#;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.client.base_url, "http://toml:2");
        assert_eq!(config.client.jitter, "full");
        assert_eq!(config.server.port, 8100);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_from_file_invalid_contents() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON format"));
    }

    #[test]
    fn test_load_from_file_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("yaml");
        std::fs::write(&path, "client: {}").unwrap();

        let err = load_from_file(Some(path.clone())).unwrap_err();
        std::fs::remove_file(path).ok();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_load_from_file_missing() {
        let err = load_from_file(Some(PathBuf::from("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_load_prefers_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BYTE_API_URL", "http://from-env:1");
        let result = load();
        clear_env();

        assert_eq!(result.unwrap().client.base_url, "http://from-env:1");
    }
}
