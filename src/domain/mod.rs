//! Domain models and types for kbackup.
//!
//! This module contains the core domain models and business rules:
//!
//! - **Strongly-typed identifiers** ([`ProjectId`], [`ExportJobId`])
//! - **Domain models** ([`Project`], [`ExportJob`], [`JobState`])
//! - **Error types** ([`KbackupError`], [`PortalError`], [`StorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so project ids and export-job ids
//! cannot be mixed:
//!
//! ```rust
//! use kbackup::domain::{ExportJobId, ProjectId};
//!
//! let project_id = ProjectId::new(101);
//! let export_id = ExportJobId::new(55);
//! // let wrong: ProjectId = export_id;  // Compile error!
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]; errors convert with `?`:
//!
//! ```rust,no_run
//! use kbackup::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = kbackup::config::load_config("kbackup.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod job;
pub mod project;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{KbackupError, PortalError, StorageError};
pub use ids::{ExportJobId, ProjectId};
pub use job::{ExportJob, JobState};
pub use project::Project;
pub use result::Result;
