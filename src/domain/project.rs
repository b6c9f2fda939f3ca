//! Project model
//!
//! A project is the unit of the batch: each configured project id gets its
//! own export job. The display name comes from the portal's project
//! directory, fetched once per batch before the loop begins, and is immutable
//! for the run's duration.

use crate::domain::ids::ProjectId;
use serde::{Deserialize, Serialize};

/// A portal project resolved from the project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Opaque numeric key identifying the project
    pub id: ProjectId,

    /// Display name, used for artifact names and storage key prefixes
    pub name: String,
}

impl Project {
    /// Create a new project
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
