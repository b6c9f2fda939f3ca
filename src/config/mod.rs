//! Configuration management for kbackup.
//!
//! TOML-based configuration loading, parsing, and validation with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `KBACKUP_*` environment variable overrides
//! - Default values for optional settings
//! - Secret-wrapped credentials that never appear in Debug output
//!
//! # Example Configuration
//!
//! ```toml
//! [portal]
//! base_url = "https://portal.example.com/vportal"
//! display_name = "Prod"
//! webdriver_url = "http://localhost:9515"
//! username = "backup-bot"
//! password = "${KBACKUP_PORTAL_PASSWORD}"
//!
//! [projects]
//! ids = [101, 102]
//!
//! [download]
//! dir = "/var/kbackup/downloads"
//!
//! [storage]
//! bucket = "kb-backups"
//! region = "us-east-1"
//! access_key = "${KBACKUP_STORAGE_ACCESS_KEY}"
//! secret_key = "${KBACKUP_STORAGE_SECRET_KEY}"
//!
//! [notify]
//! enabled = true
//! channel = "backup-status"
//! token = "${KBACKUP_NOTIFY_TOKEN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DownloadConfig, KbackupConfig, LoggingConfig, NotifyConfig, PortalConfig,
    ProjectsConfig, StorageConfig, TimeoutsConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
