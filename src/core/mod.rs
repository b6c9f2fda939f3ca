//! Core workflow logic
//!
//! # Modules
//!
//! - [`export`] - Per-project job control and sequential batch orchestration
//! - [`poll`] - Bounded polling primitive behind every wait
//!
//! # Backup Workflow
//!
//! One run processes every configured project in order:
//!
//! 1. **Fetch directory**: resolve project ids to display names
//! 2. **Generate**: trigger the server-side export and poll its status page
//! 3. **Resolve**: match the export list against the artifact name to learn
//!    the remote job id
//! 4. **Download**: trigger the browser download and wait for the partial
//!    marker to clear
//! 5. **Ship**: upload the file to object storage under
//!    `<project>/<artifact>.xml`
//! 6. **Clean up**: remove the local file
//!
//! A project's failure at any step is recorded in the batch summary and the
//! run continues with the next project.
//!
//! # Example
//!
//! ```rust,no_run
//! use kbackup::adapters::notify::NullNotifier;
//! use kbackup::adapters::portal::{PortalSession, WebDriverClient};
//! use kbackup::adapters::storage::S3Client;
//! use kbackup::config::load_config;
//! use kbackup::core::export::BatchOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("kbackup.toml")?;
//!
//! let driver = Arc::new(
//!     WebDriverClient::connect(&config.portal.webdriver_url, &config.download.dir).await?,
//! );
//! let session = Arc::new(PortalSession::new(
//!     driver,
//!     &config.portal,
//!     config.timeouts.clone(),
//! )?);
//!
//! let orchestrator = BatchOrchestrator::new(
//!     session,
//!     Arc::new(S3Client::new(&config.storage)?),
//!     Arc::new(NullNotifier),
//!     config.download.clone(),
//!     config.application.dry_run,
//!     config.projects.ids.clone(),
//! );
//!
//! let summary = orchestrator.run().await?;
//! println!("Successful: {}", summary.successful());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod poll;
