//! Configuration schema types
//!
//! This module defines the configuration structure for kbackup. The shape
//! maps one-to-one to the TOML file; every section validates itself and the
//! root config validates the cross-section requirements.

use crate::config::SecretString;
use crate::domain::ids::ProjectId;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main kbackup configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbackupConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Portal connection and authentication
    pub portal: PortalConfig,

    /// Projects to export
    pub projects: ProjectsConfig,

    /// Local download directory settings
    pub download: DownloadConfig,

    /// Object storage settings
    pub storage: StorageConfig,

    /// Chat notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Polling and timeout budgets
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KbackupConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.portal.validate()?;
        self.projects.validate()?;
        self.download.validate()?;
        self.storage.validate()?;
        self.notify.validate()?;
        self.timeouts.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (walk the workflow but skip upload and cleanup)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Portal connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the portal (e.g. `https://portal.example.com/vportal`)
    pub base_url: String,

    /// Deployment display name, prefixed to every notification
    pub display_name: String,

    /// WebDriver endpoint driving the browser (e.g. `http://localhost:9515`)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Username for portal authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for portal authentication
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl PortalConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("portal.base_url must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "portal.base_url '{}' must start with http:// or https://",
                self.base_url
            ));
        }
        if self.display_name.is_empty() {
            return Err("portal.display_name must not be empty".to_string());
        }
        if self.username.as_deref().is_none_or_empty() {
            return Err("portal.username is required".to_string());
        }
        match &self.password {
            Some(p) if !p.expose_secret().is_empty() => {}
            _ => return Err("portal.password is required".to_string()),
        }
        Ok(())
    }
}

// Small readability helper for Option<&str> emptiness checks.
trait NoneOrEmpty {
    fn is_none_or_empty(&self) -> bool;
}

impl NoneOrEmpty for Option<&str> {
    fn is_none_or_empty(&self) -> bool {
        self.map(str::trim).unwrap_or("").is_empty()
    }
}

/// Projects configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Project identifiers to export, processed sequentially in this order
    pub ids: Vec<ProjectId>,
}

impl ProjectsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("projects.ids must list at least one project".to_string());
        }
        Ok(())
    }
}

/// Local download directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory the browser downloads export files into
    pub dir: String,

    /// Extension marking an in-progress download
    #[serde(default = "default_partial_extension")]
    pub partial_extension: String,
}

impl DownloadConfig {
    fn validate(&self) -> Result<(), String> {
        if self.dir.is_empty() {
            return Err("download.dir must not be empty".to_string());
        }
        if self.partial_extension.is_empty() {
            return Err("download.partial_extension must not be empty".to_string());
        }
        Ok(())
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket receiving the artifacts
    pub bucket: String,

    /// Storage region used for request signing
    #[serde(default = "default_region")]
    pub region: String,

    /// Optional endpoint override (path-style addressing), for
    /// S3-compatible stores and test servers
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Access key id
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret access key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub secret_key: Option<SecretString>,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("storage.bucket must not be empty".to_string());
        }
        if self.region.is_empty() {
            return Err("storage.region must not be empty".to_string());
        }
        if self.access_key.as_deref().is_none_or_empty() {
            return Err("storage.access_key is required".to_string());
        }
        match &self.secret_key {
            Some(k) if !k.expose_secret().is_empty() => {}
            _ => return Err("storage.secret_key is required".to_string()),
        }
        Ok(())
    }
}

/// Chat notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Whether notifications are sent at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Channel name, without the leading `#`
    #[serde(default)]
    pub channel: String,

    /// Bot token for the chat API
    #[serde(default)]
    pub token: Option<SecretString>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: String::new(),
            token: None,
        }
    }
}

impl NotifyConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.channel.is_empty() {
            return Err("notify.channel is required when notify.enabled = true".to_string());
        }
        match &self.token {
            Some(t) if !t.expose_secret().is_empty() => Ok(()),
            _ => Err("notify.token is required when notify.enabled = true".to_string()),
        }
    }
}

/// Polling and timeout budgets
///
/// The defaults mirror the portal's observed behavior: idle-wait 50 polls at
/// 5s, export completion 20 minutes at 5s, summary load 10s, download
/// completion 5 minutes at 2s, login readiness 30s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Interval between idle-flag polls, in seconds
    #[serde(default = "default_idle_poll_interval_secs")]
    pub idle_poll_interval_secs: u64,

    /// Maximum number of idle-flag polls
    #[serde(default = "default_idle_max_polls")]
    pub idle_max_polls: usize,

    /// Bounded wait for post-login readiness, in seconds
    #[serde(default = "default_login_wait_secs")]
    pub login_wait_secs: u64,

    /// Interval between export-status polls, in seconds
    #[serde(default = "default_export_poll_interval_secs")]
    pub export_poll_interval_secs: u64,

    /// Wall-clock deadline for export completion, in seconds
    #[serde(default = "default_export_timeout_secs")]
    pub export_timeout_secs: u64,

    /// Bounded wait for the export-summary view to finish loading, in seconds
    #[serde(default = "default_summary_load_timeout_secs")]
    pub summary_load_timeout_secs: u64,

    /// Interval between download-completion polls, in seconds
    #[serde(default = "default_download_poll_interval_secs")]
    pub download_poll_interval_secs: u64,

    /// Wall-clock deadline for download completion, in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            idle_poll_interval_secs: default_idle_poll_interval_secs(),
            idle_max_polls: default_idle_max_polls(),
            login_wait_secs: default_login_wait_secs(),
            export_poll_interval_secs: default_export_poll_interval_secs(),
            export_timeout_secs: default_export_timeout_secs(),
            summary_load_timeout_secs: default_summary_load_timeout_secs(),
            download_poll_interval_secs: default_download_poll_interval_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl TimeoutsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.idle_poll_interval_secs == 0 {
            return Err("timeouts.idle_poll_interval_secs must be > 0".to_string());
        }
        if self.idle_max_polls == 0 {
            return Err("timeouts.idle_max_polls must be > 0".to_string());
        }
        if self.export_poll_interval_secs == 0 || self.download_poll_interval_secs == 0 {
            return Err("poll intervals must be > 0".to_string());
        }
        if self.export_timeout_secs < self.export_poll_interval_secs {
            return Err(
                "timeouts.export_timeout_secs must be >= export_poll_interval_secs".to_string(),
            );
        }
        if self.download_timeout_secs < self.download_poll_interval_secs {
            return Err(
                "timeouts.download_timeout_secs must be >= download_poll_interval_secs".to_string(),
            );
        }
        Ok(())
    }

    /// Idle-flag poll interval
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.idle_poll_interval_secs)
    }

    /// Post-login readiness wait
    pub fn login_wait(&self) -> Duration {
        Duration::from_secs(self.login_wait_secs)
    }

    /// Export-status poll interval
    pub fn export_poll_interval(&self) -> Duration {
        Duration::from_secs(self.export_poll_interval_secs)
    }

    /// Export completion deadline
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    /// Export-summary load wait
    pub fn summary_load_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_load_timeout_secs)
    }

    /// Download-completion poll interval
    pub fn download_poll_interval(&self) -> Duration {
        Duration::from_secs(self.download_poll_interval_secs)
    }

    /// Download completion deadline
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write a local log file in addition to the console
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path must not be empty".to_string());
        }
        let valid = ["daily", "hourly"];
        if !valid.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_partial_extension() -> String {
    ".crdownload".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_idle_poll_interval_secs() -> u64 {
    5
}

fn default_idle_max_polls() -> usize {
    50
}

fn default_login_wait_secs() -> u64 {
    30
}

fn default_export_poll_interval_secs() -> u64 {
    5
}

fn default_export_timeout_secs() -> u64 {
    20 * 60
}

fn default_summary_load_timeout_secs() -> u64 {
    10
}

fn default_download_poll_interval_secs() -> u64 {
    2
}

fn default_download_timeout_secs() -> u64 {
    5 * 60
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
