//! Bounded polling
//!
//! All waiting in the workflow is cooperative sleep-then-recheck polling on
//! the single orchestrating task; this module provides the shared primitive.

pub mod watcher;

pub use watcher::{PollDecision, PollOutcome, PollWatcher};
