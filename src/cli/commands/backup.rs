//! Backup command implementation
//!
//! This module implements the `backup` command: it wires the browser
//! session, object store, and notifier together and runs the batch.

use crate::adapters::notify::{Notifier, NullNotifier, SlackNotifier};
use crate::adapters::portal::{PortalSession, WebDriverClient};
use crate::adapters::storage::S3Client;
use crate::config::load_config;
use crate::core::export::BatchOrchestrator;
use crate::domain::ids::ProjectId;
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;

/// Arguments for the backup command
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override project ID(s) to back up (comma-separated)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Dry run mode - export and download but skip upload and cleanup
    #[arg(long)]
    pub dry_run: bool,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting backup command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(overrides) = &self.project_id {
            let mut ids = Vec::new();
            for raw in overrides.split(',') {
                match ProjectId::from_str(raw.trim()) {
                    Ok(id) => ids.push(id),
                    Err(e) => {
                        eprintln!("Invalid project id '{}': {e}", raw.trim());
                        return Ok(2);
                    }
                }
            }
            tracing::info!(project_ids = ?ids, "Overriding project IDs from CLI");
            config.projects.ids = ids;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - Artifacts will not be uploaded");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.application.dry_run {
            println!("Backup Configuration:");
            println!("  Portal: {}", config.portal.base_url);
            println!("  Environment: {}", config.portal.display_name);
            println!("  Projects: {:?}", config.projects.ids);
            println!("  Bucket: {}", config.storage.bucket);
            println!();
            print!("Proceed with backup? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Backup cancelled.");
                return Ok(0);
            }
        }

        // Connect the browser
        tracing::info!(webdriver_url = %config.portal.webdriver_url, "Connecting to WebDriver");
        let driver = match WebDriverClient::connect(
            &config.portal.webdriver_url,
            &config.download.dir,
        )
        .await
        {
            Ok(d) => Arc::new(d),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to WebDriver");
                eprintln!("Failed to connect to WebDriver: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let session = match PortalSession::new(driver.clone(), &config.portal, config.timeouts.clone())
        {
            Ok(s) => Arc::new(s),
            Err(e) => {
                driver.quit().await;
                eprintln!("Failed to create portal session: {e}");
                return Ok(2);
            }
        };

        let store = match S3Client::new(&config.storage) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                driver.quit().await;
                eprintln!("Failed to create storage client: {e}");
                return Ok(2);
            }
        };

        let notifier: Arc<dyn Notifier> = if config.notify.enabled {
            match SlackNotifier::new(&config.notify, &config.portal.display_name) {
                Ok(n) => Arc::new(n),
                Err(e) => {
                    driver.quit().await;
                    eprintln!("Failed to create notifier: {e}");
                    return Ok(2);
                }
            }
        } else {
            Arc::new(NullNotifier)
        };

        let orchestrator = BatchOrchestrator::new(
            session,
            store,
            notifier,
            config.download.clone(),
            config.application.dry_run,
            config.projects.ids.clone(),
        );

        println!("🚀 Starting backup...");
        println!();

        let summary = match orchestrator.run().await {
            Ok(s) => s,
            Err(e) => {
                driver.quit().await;
                tracing::error!(error = %e, "Batch failed");
                eprintln!("Backup failed: {e}");
                return Ok(5);
            }
        };
        driver.quit().await;

        // Display summary
        println!();
        println!("📊 Backup Summary:");
        println!("  Projects: {}", summary.outcomes.len());
        println!("  Successful: {}", summary.successful());
        println!("  Failed: {}", summary.failed());
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        for outcome in &summary.outcomes {
            match &outcome.error {
                None => println!("  ✅ {}", outcome.project),
                Some(error) => println!("  ❌ {}: {error}", outcome.project),
            }
        }
        println!();

        if summary.is_successful() {
            Ok(0)
        } else {
            Ok(1) // Some projects failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_args_defaults() {
        let args = BackupArgs {
            yes: false,
            project_id: None,
            dry_run: false,
        };
        assert!(!args.yes);
        assert!(args.project_id.is_none());
        assert!(!args.dry_run);
    }
}
