//! Export job model and state machine states
//!
//! An `ExportJob` belongs to exactly one project and is created at the start
//! of that project's run. The job carries the deterministic artifact name,
//! the remote job id once resolved, and the current state. Jobs for different
//! projects never interleave within a single portal session.

use crate::domain::ids::ExportJobId;
use crate::domain::project::Project;
use chrono::{DateTime, Utc};

/// States of a per-project export job
///
/// The workflow drives a job through these states in order; the failure
/// states end the job early and are reported per project without affecting
/// the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    LoggedIn,
    ProjectOpen,
    ExportTriggered,
    ExportPolling,
    ExportSucceeded,
    ExportFailed,
    ExportIdResolved,
    DownloadTriggered,
    DownloadPolling,
    DownloadVerified,
    DownloadFailed,
    Uploaded,
    UploadFailed,
    CleanedUp,
}

impl JobState {
    /// Whether this state represents a failure outcome
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobState::ExportFailed | JobState::DownloadFailed | JobState::UploadFailed
        )
    }

    /// State name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::LoggedIn => "logged_in",
            JobState::ProjectOpen => "project_open",
            JobState::ExportTriggered => "export_triggered",
            JobState::ExportPolling => "export_polling",
            JobState::ExportSucceeded => "export_succeeded",
            JobState::ExportFailed => "export_failed",
            JobState::ExportIdResolved => "export_id_resolved",
            JobState::DownloadTriggered => "download_triggered",
            JobState::DownloadPolling => "download_polling",
            JobState::DownloadVerified => "download_verified",
            JobState::DownloadFailed => "download_failed",
            JobState::Uploaded => "uploaded",
            JobState::UploadFailed => "upload_failed",
            JobState::CleanedUp => "cleaned_up",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single project's export job
///
/// Created at the start of a project's run, discarded after cleanup.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// The project this job belongs to
    pub project: Project,

    /// Generated artifact base name (without the `.xml` extension)
    artifact: String,

    /// Remote job id; absent until resolved, immutable afterwards
    remote_id: Option<ExportJobId>,

    /// Current state
    pub state: JobState,

    /// When the job started
    pub started_at: DateTime<Utc>,
}

impl ExportJob {
    /// Create a new job for a project with a timestamp-suffixed artifact name
    pub fn new(project: Project, now: DateTime<Utc>) -> Self {
        let artifact = format!(
            "{}_kb_dump-{}",
            project.name,
            now.format("%Y-%m-%d-%H-%M-%S")
        );
        Self {
            project,
            artifact,
            remote_id: None,
            state: JobState::Created,
            started_at: now,
        }
    }

    /// Artifact base name, without extension
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Remote file name as the portal materializes it
    pub fn artifact_file_name(&self) -> String {
        format!("{}.xml", self.artifact)
    }

    /// Object storage key: `<displayName>/<artifactFileName>`
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.project.name, self.artifact_file_name())
    }

    /// The resolved remote job id, if any
    pub fn remote_id(&self) -> Option<ExportJobId> {
        self.remote_id
    }

    /// Record the resolved remote job id
    ///
    /// The id is immutable once set; a second resolution attempt for the same
    /// job is a programming error and is ignored with a warning.
    pub fn resolve_remote_id(&mut self, id: ExportJobId) {
        if let Some(existing) = self.remote_id {
            tracing::warn!(
                project_id = %self.project.id,
                existing = %existing,
                attempted = %id,
                "Remote export id already resolved, ignoring re-resolution"
            );
            return;
        }
        self.remote_id = Some(id);
    }

    /// Advance to a new state
    pub fn transition(&mut self, state: JobState) {
        tracing::debug!(
            project_id = %self.project.id,
            from = %self.state,
            to = %state,
            "Job state transition"
        );
        self.state = state;
    }
}
