//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the kbackup configuration file. Credentials are checked for presence
//! but never printed.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after env substitution and overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Portal: {}", config.portal.base_url);
        println!("  Environment: {}", config.portal.display_name);
        println!("  WebDriver: {}", config.portal.webdriver_url);
        println!("  Projects: {:?}", config.projects.ids);
        println!("  Download Dir: {}", config.download.dir);
        println!("  Bucket: {}", config.storage.bucket);
        println!("  Region: {}", config.storage.region);
        if let Some(endpoint) = &config.storage.endpoint {
            println!("  Storage Endpoint: {endpoint}");
        }
        println!(
            "  Notifications: {}",
            if config.notify.enabled {
                format!("enabled (#{})", config.notify.channel)
            } else {
                "disabled".to_string()
            }
        );
        println!(
            "  Export Timeout: {}s at {}s intervals",
            config.timeouts.export_timeout_secs, config.timeouts.export_poll_interval_secs
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_missing_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/kbackup.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
