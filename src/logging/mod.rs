//! Logging and observability
//!
//! Structured logging with configurable log levels, console output, and a
//! local JSON log file with rotation. The rotated file gives the operator
//! the persistent dated record of every state transition and error.
//!
//! # Example
//!
//! ```no_run
//! use kbackup::logging::init_logging;
//! use kbackup::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
