//! Domain identifier types
//!
//! Newtype wrappers for portal identifiers. Both identifiers are numeric keys
//! assigned by the portal; the newtypes keep project ids and export-job ids
//! from being mixed up in call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project identifier newtype wrapper
///
/// An opaque numeric key identifying a portal project. Sourced from
/// configuration and from the portal's all-projects listing.
///
/// # Examples
///
/// ```
/// use kbackup::domain::ids::ProjectId;
///
/// let id = ProjectId::new(101);
/// assert_eq!(id.value(), 101);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    /// Creates a new ProjectId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric project id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| format!("Invalid project id '{s}': must be an integer"))
    }
}

/// Export job identifier newtype wrapper
///
/// The server-side identifier of a knowledge-base export job. Assigned by the
/// portal only after the export has been created; resolved by matching the
/// generated artifact name against the portal's export listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportJobId(i64);

impl ExportJobId {
    /// Creates a new ExportJobId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric export job id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExportJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_from_str() {
        let id = ProjectId::from_str("101").unwrap();
        assert_eq!(id.value(), 101);
    }

    #[test]
    fn test_project_id_from_str_trims_whitespace() {
        let id = ProjectId::from_str(" 42 ").unwrap();
        assert_eq!(id, ProjectId::new(42));
    }

    #[test]
    fn test_project_id_from_str_invalid() {
        assert!(ProjectId::from_str("abc").is_err());
        assert!(ProjectId::from_str("").is_err());
    }

    #[test]
    fn test_project_id_display() {
        assert_eq!(ProjectId::new(7).to_string(), "7");
    }

    #[test]
    fn test_export_job_id_value() {
        let id = ExportJobId::new(55);
        assert_eq!(id.value(), 55);
        assert_eq!(id.to_string(), "55");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Type safety: these must not compare or assign across newtypes.
        let project = ProjectId::new(1);
        let job = ExportJobId::new(1);
        assert_eq!(project.value(), job.value());
    }
}
