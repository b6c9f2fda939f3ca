//! Batch summary and per-project reporting

use crate::domain::job::JobState;
use crate::domain::project::Project;
use std::time::Duration;

/// Outcome of one project's export job
#[derive(Debug, Clone)]
pub struct ProjectOutcome {
    /// The project this outcome belongs to
    pub project: Project,

    /// Final state the job reached
    pub final_state: JobState,

    /// Error text when the job failed
    pub error: Option<String>,

    /// How long the project took end to end
    pub duration: Duration,
}

impl ProjectOutcome {
    /// Whether this project's backup completed
    pub fn is_success(&self) -> bool {
        !self.final_state.is_failure()
    }
}

/// Summary of a whole batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Per-project outcomes, in processing order
    pub outcomes: Vec<ProjectOutcome>,

    /// Duration of the batch
    pub duration: Duration,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one project's outcome
    pub fn record(&mut self, outcome: ProjectOutcome) {
        self.outcomes.push(outcome);
    }

    /// Set the total duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.successful()
    }

    /// Whether every project completed
    pub fn is_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Log the summary at the end of a run
    pub fn log(&self) {
        tracing::info!(
            projects = self.outcomes.len(),
            successful = self.successful(),
            failed = self.failed(),
            duration_secs = self.duration.as_secs(),
            "Batch finished"
        );
        for outcome in &self.outcomes {
            if let Some(error) = &outcome.error {
                tracing::warn!(
                    project = %outcome.project,
                    final_state = %outcome.final_state,
                    error = %error,
                    "Project backup failed"
                );
            } else {
                tracing::info!(
                    project = %outcome.project,
                    final_state = %outcome.final_state,
                    duration_secs = outcome.duration.as_secs(),
                    "Project backup completed"
                );
            }
        }
    }
}
