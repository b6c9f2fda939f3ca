//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "kbackup.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing kbackup configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your portal and bucket settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set KBACKUP_PORTAL_USERNAME and KBACKUP_PORTAL_PASSWORD");
                println!("     - Set KBACKUP_STORAGE_ACCESS_KEY and KBACKUP_STORAGE_SECRET_KEY");
                println!("     - Set KBACKUP_NOTIFY_TOKEN (if notifications are enabled)");
                println!("  3. Start chromedriver on the configured webdriver_url");
                println!("  4. Validate configuration: kbackup validate-config");
                println!("  5. Run the backup: kbackup backup");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# kbackup Configuration File
# Knowledge-base export and backup tool

[application]
log_level = "info"
dry_run = false

[portal]
base_url = "https://portal.example.com/vportal"
display_name = "Production"
webdriver_url = "http://localhost:9515"
username = "${KBACKUP_PORTAL_USERNAME}"
password = "${KBACKUP_PORTAL_PASSWORD}"

[projects]
# Portal project ids to back up, processed in order
ids = [101, 202]

[download]
# Directory the browser downloads export files into
dir = "/tmp/kbackup-downloads"
partial_extension = ".crdownload"

[storage]
bucket = "kb-backups"
region = "us-east-1"
# endpoint = "https://s3.example.com"  # S3-compatible stores only
access_key = "${KBACKUP_STORAGE_ACCESS_KEY}"
secret_key = "${KBACKUP_STORAGE_SECRET_KEY}"

[notify]
enabled = false
channel = "kb-backups"
token = "${KBACKUP_NOTIFY_TOKEN}"

[timeouts]
idle_poll_interval_secs = 5
idle_max_polls = 50
login_wait_secs = 30
export_poll_interval_secs = 5
export_timeout_secs = 1200
summary_load_timeout_secs = 10
download_poll_interval_secs = 2
download_timeout_secs = 300

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbackup.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_parseable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbackup.toml");

        let args = InitArgs {
            output: path.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[portal]"));
        assert!(content.contains("${KBACKUP_PORTAL_PASSWORD}"));
        // The template itself is valid TOML.
        let parsed: toml::Value = toml::from_str(&content).unwrap();
        assert!(parsed.get("storage").is_some());
    }
}
