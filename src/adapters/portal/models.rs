//! Portal response models
//!
//! The portal's JSON-bearing pages return `{"rows": [...]}` envelopes; its
//! status page returns plain text. All parsing of that dynamic surface into
//! typed records happens here, at the adapter boundary.

use crate::domain::ids::{ExportJobId, ProjectId};
use crate::domain::project::Project;
use crate::domain::{PortalError, Result};
use serde::Deserialize;

/// Literal error text the status page shows when the session was taken over
pub const SESSION_INVALIDATED_MARKER: &str =
    "An error has occurred OR your session has been invalidated due to login on other browser/system.";

/// Envelope for the portal's row-listing pages
#[derive(Debug, Deserialize)]
pub struct RowsPage<T> {
    pub rows: Vec<T>,
}

/// One row of the all-projects listing
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRow {
    #[serde(rename = "projectId")]
    pub project_id: i64,

    #[serde(rename = "projectName")]
    pub project_name: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project::new(ProjectId::new(row.project_id), row.project_name)
    }
}

/// One row of a project's export listing
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "fileNm")]
    pub file_name: String,

    #[serde(rename = "kbExportId")]
    pub export_id: i64,
}

impl ExportRow {
    /// The export job id of this row
    pub fn id(&self) -> ExportJobId {
        ExportJobId::new(self.export_id)
    }
}

/// Parse a `{"rows": [...]}` page body
pub fn parse_rows<T: for<'de> Deserialize<'de>>(body: &str) -> Result<Vec<T>> {
    let page: RowsPage<T> = serde_json::from_str(body.trim())
        .map_err(|e| PortalError::InvalidResponse(format!("Failed to parse rows page: {e}")))?;
    Ok(page.rows)
}

/// Terminal and in-progress outcomes of the export status page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// The export file has been generated
    Success,
    /// The session was invalidated by a login elsewhere; not retryable
    /// within this run
    SessionInvalidated,
    /// Anything else the page shows while the export is running
    InProgress(String),
}

impl ExportStatus {
    /// Classify the status page text
    pub fn parse(body: &str) -> Self {
        let text = body.trim();
        if text == "Success" {
            ExportStatus::Success
        } else if text.contains(SESSION_INVALIDATED_MARKER) {
            ExportStatus::SessionInvalidated
        } else {
            ExportStatus::InProgress(text.to_string())
        }
    }

    /// Whether this status ends the poll
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExportStatus::InProgress(_))
    }
}
