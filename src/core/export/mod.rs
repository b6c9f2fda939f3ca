//! Export pipeline
//!
//! The per-project [`controller::ExportJobController`] drives one job end to
//! end; the [`batch::BatchOrchestrator`] runs every configured project
//! sequentially over one portal session and collects the
//! [`summary::BatchSummary`].

pub mod batch;
pub mod controller;
pub mod summary;

pub use batch::BatchOrchestrator;
pub use controller::ExportJobController;
pub use summary::{BatchSummary, ProjectOutcome};
