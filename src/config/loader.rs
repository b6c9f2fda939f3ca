//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::KbackupConfig;
use crate::config::secret_string;
use crate::domain::errors::KbackupError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into KbackupConfig
/// 4. Applies environment variable overrides (KBACKUP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use kbackup::config::load_config;
///
/// let config = load_config("kbackup.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<KbackupConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(KbackupError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        KbackupError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: KbackupConfig = toml::from_str(&contents)
        .map_err(|e| KbackupError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        KbackupError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_-]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
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
        return Err(KbackupError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the KBACKUP_* prefix
///
/// Environment variables follow the pattern: KBACKUP_<SECTION>_<KEY>
/// For example: KBACKUP_PORTAL_BASE_URL, KBACKUP_STORAGE_BUCKET
fn apply_env_overrides(config: &mut KbackupConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("KBACKUP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Portal overrides
    if let Ok(val) = std::env::var("KBACKUP_PORTAL_BASE_URL") {
        config.portal.base_url = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_PORTAL_WEBDRIVER_URL") {
        config.portal.webdriver_url = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_PORTAL_USERNAME") {
        config.portal.username = Some(val);
    }
    if let Ok(val) = std::env::var("KBACKUP_PORTAL_PASSWORD") {
        config.portal.password = Some(secret_string(val));
    }

    // Download overrides
    if let Ok(val) = std::env::var("KBACKUP_DOWNLOAD_DIR") {
        config.download.dir = val;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("KBACKUP_STORAGE_BUCKET") {
        config.storage.bucket = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_STORAGE_REGION") {
        config.storage.region = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_STORAGE_ENDPOINT") {
        config.storage.endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("KBACKUP_STORAGE_ACCESS_KEY") {
        config.storage.access_key = Some(val);
    }
    if let Ok(val) = std::env::var("KBACKUP_STORAGE_SECRET_KEY") {
        config.storage.secret_key = Some(secret_string(val));
    }

    // Notify overrides
    if let Ok(val) = std::env::var("KBACKUP_NOTIFY_ENABLED") {
        config.notify.enabled = val.parse().unwrap_or(config.notify.enabled);
    }
    if let Ok(val) = std::env::var("KBACKUP_NOTIFY_CHANNEL") {
        config.notify.channel = val;
    }
    if let Ok(val) = std::env::var("KBACKUP_NOTIFY_TOKEN") {
        config.notify.token = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("KBACKUP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("KBACKUP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
