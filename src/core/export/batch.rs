//! Sequential batch orchestration
//!
//! Runs the configured projects one after another over a single portal
//! session. The portal scopes "current project" per session, so projects
//! are never processed concurrently. One project's failure is recorded and
//! the batch moves on; only a failure to fetch the project directory is
//! fatal to the whole batch, since no display names can be resolved
//! without it.

use crate::adapters::notify::Notifier;
use crate::adapters::portal::PortalSession;
use crate::adapters::storage::ObjectStore;
use crate::config::DownloadConfig;
use crate::core::export::controller::ExportJobController;
use crate::core::export::summary::{BatchSummary, ProjectOutcome};
use crate::domain::ids::ProjectId;
use crate::domain::job::JobState;
use crate::domain::project::Project;
use crate::domain::Result;
use std::sync::Arc;
use std::time::Duration;

/// Orchestrator for one batch run
pub struct BatchOrchestrator {
    session: Arc<PortalSession>,
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    download: DownloadConfig,
    dry_run: bool,
    project_ids: Vec<ProjectId>,
}

impl BatchOrchestrator {
    pub fn new(
        session: Arc<PortalSession>,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        download: DownloadConfig,
        dry_run: bool,
        project_ids: Vec<ProjectId>,
    ) -> Self {
        Self {
            session,
            store,
            notifier,
            download,
            dry_run,
            project_ids,
        }
    }

    /// Run the whole batch and report per-project outcomes
    ///
    /// Configured order is preserved. A configured id missing from the
    /// portal's directory is reported as that project's failure, not the
    /// batch's.
    pub async fn run(&self) -> Result<BatchSummary> {
        let started = std::time::Instant::now();
        tracing::info!(projects = self.project_ids.len(), "Starting batch");
        self.notify(&format!(
            "KB backup starting for {} project(s)",
            self.project_ids.len()
        ))
        .await;

        let directory = self.session.fetch_projects().await?;

        let mut summary = BatchSummary::new();
        for id in &self.project_ids {
            let Some(project) = directory.iter().find(|p| p.id == *id) else {
                tracing::error!(project_id = %id, "Configured project not in portal directory");
                summary.record(ProjectOutcome {
                    project: Project::new(*id, format!("unknown-{id}")),
                    final_state: JobState::ExportFailed,
                    error: Some(format!("Project {id} not found in portal directory")),
                    duration: Duration::ZERO,
                });
                continue;
            };

            let controller = ExportJobController::new(
                self.session.clone(),
                self.store.clone(),
                self.notifier.clone(),
                self.download.clone(),
                self.dry_run,
                project.clone(),
            );
            summary.record(controller.run().await);
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log();
        self.notify(&format!(
            "KB backup finished: {} succeeded, {} failed",
            summary.successful(),
            summary.failed()
        ))
        .await;
        Ok(summary)
    }

    async fn notify(&self, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            tracing::warn!(error = %e, "Notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::portal::pages;
    use crate::adapters::portal::testing::MockDriver;
    use crate::adapters::storage::UploadReceipt;
    use crate::config::{secret_string, PortalConfig, TimeoutsConfig};
    use crate::domain::{KbackupError, PortalError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Mutex;

    const BASE: &str = "https://portal.example.com/vportal";

    struct NullStore;

    #[async_trait]
    impl ObjectStore for NullStore {
        async fn put_object(&self, key: &str, _path: &Path) -> Result<UploadReceipt> {
            Ok(UploadReceipt {
                bucket: "test".to_string(),
                key: key.to_string(),
                bytes: 0,
                etag: None,
            })
        }
    }

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> Result<()> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn fast_timeouts() -> TimeoutsConfig {
        TimeoutsConfig {
            idle_poll_interval_secs: 1,
            idle_max_polls: 2,
            login_wait_secs: 2,
            export_poll_interval_secs: 1,
            export_timeout_secs: 3,
            summary_load_timeout_secs: 2,
            download_poll_interval_secs: 1,
            download_timeout_secs: 2,
        }
    }

    fn session_over(driver: Arc<MockDriver>) -> Arc<PortalSession> {
        let portal = PortalConfig {
            base_url: BASE.to_string(),
            display_name: "Test".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            username: Some("bot".to_string()),
            password: Some(secret_string("pw".to_string())),
        };
        Arc::new(PortalSession::new(driver, &portal, fast_timeouts()).unwrap())
    }

    fn orchestrator_over(
        driver: Arc<MockDriver>,
        ids: Vec<ProjectId>,
        dir: &Path,
    ) -> (BatchOrchestrator, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier {
            messages: Mutex::new(Vec::new()),
        });
        let orchestrator = BatchOrchestrator::new(
            session_over(driver),
            Arc::new(NullStore),
            notifier.clone(),
            DownloadConfig {
                dir: dir.display().to_string(),
                partial_extension: ".crdownload".to_string(),
            },
            false,
            ids,
        );
        (orchestrator, notifier)
    }

    fn scripted_driver() -> Arc<MockDriver> {
        let driver = Arc::new(MockDriver::new());
        driver.set_redirect(BASE, &format!("{BASE}/viewProjectList.html"));
        driver.set_script_result(pages::LOADING_FLAG_SCRIPT, json!(false));
        driver.set_script_result(pages::OBJECT_LOADED_FLAG_SCRIPT, json!(false));
        driver.queue_page_texts(
            "getAllProjects",
            &[r#"{"rows": [{"projectId": 101, "projectName": "Acme"}]}"#],
        );
        driver
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_fetch_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        driver.queue_page_texts("getAllProjects", &["<html>not json</html>"]);
        let (orchestrator, _) = orchestrator_over(driver, vec![ProjectId::new(101)], dir.path());

        let err = orchestrator.run().await.unwrap_err();
        assert!(matches!(
            err,
            KbackupError::Portal(PortalError::InvalidResponse(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_project_id_fails_only_that_project() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        // Project 101 resolves but its export poll times out; 999 is unknown.
        driver.queue_page_texts("isKBExportProcessed", &["still running"]);
        let (orchestrator, notifier) = orchestrator_over(
            driver,
            vec![ProjectId::new(999), ProjectId::new(101)],
            dir.path(),
        );

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.failed(), 2);
        assert!(summary.outcomes[0]
            .error
            .as_deref()
            .unwrap_or("")
            .contains("not found in portal directory"));
        // The unknown id did not stop the batch from processing 101.
        assert_eq!(summary.outcomes[1].project.name, "Acme");
        assert!(notifier
            .messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains("KB backup finished")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_preserves_configured_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        driver.queue_page_texts(
            "getAllProjects",
            &[r#"{"rows": [{"projectId": 101, "projectName": "Acme"}, {"projectId": 202, "projectName": "Beta"}]}"#],
        );
        // Both exports succeed server-side but the export list only ever
        // names Beta's artifact, so Acme fails at id resolution.
        driver.queue_page_texts("isKBExportProcessed", &["Success"]);
        let (orchestrator, _) = orchestrator_over(
            driver.clone(),
            vec![ProjectId::new(101), ProjectId::new(202)],
            dir.path(),
        );

        // Artifact names carry a per-run timestamp, so an export list that
        // matches nothing makes both jobs fail at id resolution.
        driver.queue_page_texts(
            "getAllKbExportList",
            &[r#"{"rows": [{"fileNm": "unrelated.xml", "kbExportId": 9}]}"#],
        );

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.outcomes.len(), 2);
        assert_eq!(summary.outcomes[0].project.name, "Acme");
        assert_eq!(summary.outcomes[1].project.name, "Beta");
        // Both failed at resolution, but both were attempted.
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.outcomes[0].final_state, JobState::ExportFailed);
        assert_eq!(summary.outcomes[1].final_state, JobState::ExportFailed);
    }
}
