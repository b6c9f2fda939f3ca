// kbackup - Knowledge-base export and backup tool
// Copyright (c) 2026 Kbackup Contributors
// Licensed under the MIT License

//! # kbackup - Automated knowledge-base backups
//!
//! kbackup drives a browser-only web portal to export each configured
//! project's knowledge base, downloads the generated file, and ships it to
//! S3-compatible object storage. The portal offers no API for any of this:
//! exports are triggered by in-page scripts, observed by polling a status
//! page, and collected through the browser's download directory.
//!
//! ## Overview
//!
//! One run processes every configured project sequentially:
//!
//! - **Authenticate** a stateful portal session through WebDriver
//! - **Trigger** the server-side export under a timestamped artifact name
//! - **Poll** the status page until the export completes
//! - **Resolve** the opaque export job id by matching the export list
//!   against the artifact name
//! - **Download** the file and wait for the partial-download marker to clear
//! - **Upload** the artifact to object storage under `<project>/<file>.xml`
//! - **Clean up** the local file
//!
//! A project's failure never stops the batch; outcomes are collected and
//! reported at the end.
//!
//! ## Architecture
//!
//! kbackup follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (job control, batch orchestration, polling)
//! - [`adapters`] - External integrations (portal, object storage, chat)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kbackup::adapters::notify::NullNotifier;
//! use kbackup::adapters::portal::{PortalSession, WebDriverClient};
//! use kbackup::adapters::storage::S3Client;
//! use kbackup::config::load_config;
//! use kbackup::core::export::BatchOrchestrator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("kbackup.toml")?;
//!
//!     let driver = Arc::new(
//!         WebDriverClient::connect(&config.portal.webdriver_url, &config.download.dir)
//!             .await?,
//!     );
//!     let session = Arc::new(PortalSession::new(
//!         driver.clone(),
//!         &config.portal,
//!         config.timeouts.clone(),
//!     )?);
//!
//!     let orchestrator = BatchOrchestrator::new(
//!         session,
//!         Arc::new(S3Client::new(&config.storage)?),
//!         Arc::new(NullNotifier),
//!         config.download.clone(),
//!         config.application.dry_run,
//!         config.projects.ids.clone(),
//!     );
//!
//!     let summary = orchestrator.run().await?;
//!     driver.quit().await;
//!
//!     println!("Backed up {} project(s)", summary.successful());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! kbackup uses the [`domain::KbackupError`] type for all errors:
//!
//! ```rust,no_run
//! use kbackup::domain::KbackupError;
//!
//! fn example() -> Result<(), KbackupError> {
//!     let config = kbackup::config::load_config("kbackup.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! kbackup uses structured logging with the `tracing` crate. Credentials
//! never appear in log output; they are held in zeroizing secret wrappers
//! end to end.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
