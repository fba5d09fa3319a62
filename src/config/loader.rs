//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (INCIDENT_SYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use incident_sync::config::loader::load_config;
///
/// let config = load_config("incident-sync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Applies the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<SyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the INCIDENT_SYNC_* prefix
///
/// Variables follow the pattern INCIDENT_SYNC_<SECTION>_<KEY>, for example
/// INCIDENT_SYNC_REMOTE_BASE_URL.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] naming the variable when a boolean
/// or numeric override cannot be parsed.
fn apply_env_overrides(config: &mut SyncConfig) -> Result<()> {
    fn var(name: &str) -> Option<String> {
        std::env::var(format!("INCIDENT_SYNC_{name}")).ok()
    }

    fn parsed<T>(name: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        var(name)
            .map(|val| {
                val.trim().parse().map_err(|e| {
                    SyncError::Configuration(format!(
                        "Invalid value '{val}' for INCIDENT_SYNC_{name}: {e}"
                    ))
                })
            })
            .transpose()
    }

    // Application
    if let Some(val) = var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(dry_run) = parsed("APPLICATION_DRY_RUN")? {
        config.application.dry_run = dry_run;
    }

    // Remote
    if let Some(val) = var("REMOTE_BASE_URL") {
        config.remote.base_url = val;
    }
    if let Some(val) = var("REMOTE_CLIENT_NAME") {
        config.remote.client_name = val;
    }
    if let Some(val) = var("REMOTE_API_KEY") {
        config.remote.api_key = secret_string(val);
    }
    if let Some(timeout) = parsed("REMOTE_TIMEOUT_SECONDS")? {
        config.remote.timeout_seconds = timeout;
    }
    if let Some(redirects) = parsed("REMOTE_MAX_REDIRECTS")? {
        config.remote.max_redirects = redirects;
    }

    // Database
    if let Some(val) = var("DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Some(max) = parsed("DATABASE_MAX_CONNECTIONS")? {
        config.database.max_connections = max;
    }

    // Schedule
    if let Some(enabled) = parsed("SCHEDULE_ENABLED")? {
        config.schedule.enabled = enabled;
    }
    if let Some(interval) = parsed("SCHEDULE_INTERVAL_SECONDS")? {
        config.schedule.interval_seconds = interval;
    }
    if let Some(delay) = parsed("SCHEDULE_STARTUP_DELAY_SECONDS")? {
        config.schedule.startup_delay_seconds = delay;
    }

    // Server
    if let Some(enabled) = parsed("SERVER_ENABLED")? {
        config.server.enabled = enabled;
    }
    if let Some(val) = var("SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }

    // Logging
    if let Some(enabled) = parsed("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
