//! Per-project export job controller
//!
//! Drives a single project through the full backup workflow: trigger the
//! server-side export, poll it to completion, resolve the remote job id from
//! the export list, trigger and await the browser download, ship the file to
//! object storage, and clean up. Each phase advances the job's state; any
//! error ends the job in the matching failure state and the batch moves on
//! to the next project.
//!
//! The portal never reports the id of a freshly triggered export, so the
//! controller re-authenticates after generation and matches the export list
//! against the timestamped artifact name it chose up front.

use crate::adapters::notify::Notifier;
use crate::adapters::portal::models::ExportStatus;
use crate::adapters::portal::{pages, PortalSession};
use crate::adapters::storage::ObjectStore;
use crate::config::DownloadConfig;
use crate::core::export::summary::ProjectOutcome;
use crate::core::poll::{PollDecision, PollOutcome, PollWatcher};
use crate::domain::job::{ExportJob, JobState};
use crate::domain::project::Project;
use crate::domain::{PortalError, Result};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Settle delay after opening the export-detail tab
const TAB_SETTLE: Duration = Duration::from_secs(10);

/// Controller for one project's export job
pub struct ExportJobController {
    session: Arc<PortalSession>,
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    download: DownloadConfig,
    dry_run: bool,
    job: ExportJob,
}

impl ExportJobController {
    /// Create a controller for a project
    ///
    /// The artifact name is fixed at creation time; everything downstream
    /// (export-list matching, download verification, the storage key) derives
    /// from it. In dry-run mode the export still runs and downloads, but the
    /// artifact is neither uploaded nor removed.
    pub fn new(
        session: Arc<PortalSession>,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        download: DownloadConfig,
        dry_run: bool,
        project: Project,
    ) -> Self {
        let job = ExportJob::new(project, Utc::now());
        Self {
            session,
            store,
            notifier,
            download,
            dry_run,
            job,
        }
    }

    /// Run the job to completion and report its outcome
    ///
    /// Never returns an error: failures are captured in the outcome so the
    /// batch can continue with the next project. Cleanup runs exactly once,
    /// whatever the job's fate.
    pub async fn run(mut self) -> ProjectOutcome {
        let started = std::time::Instant::now();
        tracing::info!(
            project = %self.job.project,
            artifact = %self.job.artifact(),
            "Starting project backup"
        );

        let result = self.drive().await;
        self.cleanup().await;

        let error = match &result {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(
                    project = %self.job.project,
                    final_state = %self.job.state,
                    error = %e,
                    "Project backup failed"
                );
                self.notify(&format!(
                    "KB backup FAILED for {}: {e}",
                    self.job.project.name
                ))
                .await;
                Some(e.to_string())
            }
        };

        ProjectOutcome {
            project: self.job.project.clone(),
            final_state: self.job.state,
            error,
            duration: started.elapsed(),
        }
    }

    /// The happy path, with phase errors mapped to failure states
    async fn drive(&mut self) -> Result<()> {
        if let Err(e) = self.generate().await {
            self.fail(JobState::ExportFailed);
            return Err(e);
        }
        if let Err(e) = self.resolve_export_id().await {
            self.fail(JobState::ExportFailed);
            return Err(e);
        }
        if let Err(e) = self.download_artifact().await {
            self.fail(JobState::DownloadFailed);
            return Err(e);
        }
        if self.dry_run {
            tracing::info!(project = %self.job.project, "Dry run: skipping upload");
            return Ok(());
        }
        if let Err(e) = self.upload_artifact().await {
            self.fail(JobState::UploadFailed);
            return Err(e);
        }
        Ok(())
    }

    fn fail(&mut self, state: JobState) {
        if !self.job.state.is_failure() {
            self.job.transition(state);
        }
    }

    /// Trigger the server-side export and poll it to a terminal status
    async fn generate(&mut self) -> Result<()> {
        self.session.login().await?;
        self.job.transition(JobState::LoggedIn);

        self.session.open_project(self.job.project.id).await?;
        self.job.transition(JobState::ProjectOpen);

        self.session
            .run_script(pages::open_export_summary_script())
            .await?;
        self.session.await_idle().await;

        // The export-detail tab loads asynchronously and exposes no ready
        // flag of its own.
        self.session
            .run_script(pages::open_export_detail_script())
            .await?;
        tokio::time::sleep(TAB_SETTLE).await;
        self.session.await_idle().await;

        self.session
            .run_script(pages::select_all_content_script())
            .await?;
        self.session.await_idle().await;

        self.session.set_export_file_name(self.job.artifact()).await?;
        self.session.run_script(pages::save_export_script()).await?;
        self.job.transition(JobState::ExportTriggered);
        self.session.await_idle().await;

        self.session.open_status_page().await?;
        self.job.transition(JobState::ExportPolling);
        let status = self.poll_export_status().await;
        self.session.logout().await;

        match status {
            Some(ExportStatus::Success) => {
                self.job.transition(JobState::ExportSucceeded);
                self.notify(&format!(
                    "KB export generated for {}",
                    self.job.project.name
                ))
                .await;
                Ok(())
            }
            Some(ExportStatus::SessionInvalidated) => Err(PortalError::SessionInvalidated(
                format!("While polling export for {}", self.job.project),
            )
            .into()),
            _ => Err(PortalError::ExportTimeout(format!(
                "Export for {} not finished within {}s",
                self.job.project,
                self.session.timeouts().export_timeout().as_secs()
            ))
            .into()),
        }
    }

    /// Poll the status page until a terminal status or the budget runs out
    ///
    /// The first probe reads the page as navigated to; subsequent probes
    /// reload it first. Returns `None` on timeout.
    async fn poll_export_status(&self) -> Option<ExportStatus> {
        let timeouts = self.session.timeouts();
        let watcher =
            PollWatcher::with_deadline(timeouts.export_poll_interval(), timeouts.export_timeout());

        let terminal: RefCell<Option<ExportStatus>> = RefCell::new(None);
        let first = Cell::new(true);
        let session = self.session.as_ref();
        let terminal_ref = &terminal;
        let first_ref = &first;

        let outcome = watcher
            .poll(move || async move {
                if !first_ref.replace(false) {
                    session.refresh_status_page().await;
                }
                let status = session.read_export_status().await;
                if status.is_terminal() {
                    *terminal_ref.borrow_mut() = Some(status);
                    PollDecision::Done
                } else {
                    if let ExportStatus::InProgress(text) = &status {
                        tracing::debug!(status = %text, "Export still in progress");
                    }
                    PollDecision::Continue
                }
            })
            .await;

        if outcome == PollOutcome::TimedOut {
            return None;
        }
        terminal.into_inner()
    }

    /// Re-authenticate and match the export list against the artifact name
    async fn resolve_export_id(&mut self) -> Result<()> {
        self.session.login().await?;
        self.session.open_project(self.job.project.id).await?;

        let wanted = self.job.artifact_file_name();
        let rows = self.session.fetch_export_rows().await?;
        let row = rows
            .iter()
            .find(|row| row.file_name == wanted)
            .ok_or_else(|| {
                PortalError::ExportIdNotFound(format!(
                    "No export list row named {wanted} among {} rows",
                    rows.len()
                ))
            })?;

        self.job.resolve_remote_id(row.id());
        self.job.transition(JobState::ExportIdResolved);
        tracing::info!(
            project = %self.job.project,
            export_id = %row.id(),
            "Resolved remote export id"
        );
        Ok(())
    }

    /// Trigger the browser download and wait for it to finish on disk
    async fn download_artifact(&mut self) -> Result<()> {
        let remote_id = self.job.remote_id().ok_or_else(|| {
            PortalError::ExportIdNotFound(format!(
                "No remote id resolved for {}",
                self.job.project
            ))
        })?;
        let timeouts = self.session.timeouts();

        self.session
            .run_script(pages::open_export_summary_script())
            .await?;
        let loaded = self
            .session
            .wait_absent(
                pages::SUMMARY_LOADING_INDICATOR,
                timeouts.summary_load_timeout(),
            )
            .await;
        if loaded == PollOutcome::TimedOut {
            return Err(PortalError::ActionFailed(
                "Export summary never finished loading".to_string(),
            )
            .into());
        }

        self.session
            .run_script(&pages::download_export_script(remote_id))
            .await?;
        self.job.transition(JobState::DownloadTriggered);
        self.session.await_idle().await;

        self.job.transition(JobState::DownloadPolling);
        let finished = self.poll_download_complete().await;
        if finished == PollOutcome::TimedOut {
            return Err(PortalError::DownloadTimeout(format!(
                "Partial download files still present after {}s",
                timeouts.download_timeout().as_secs()
            ))
            .into());
        }

        // The markers being gone does not prove the final file exists; a
        // missing file surfaces at upload time as an unreadable artifact.
        let path = self.artifact_path();
        if !path.exists() {
            tracing::error!(
                path = %path.display(),
                "Downloaded artifact not found after download wait"
            );
        }
        self.job.transition(JobState::DownloadVerified);
        self.session.logout().await;
        self.notify(&format!(
            "KB export downloaded for {}",
            self.job.project.name
        ))
        .await;
        Ok(())
    }

    /// Wait until no file in the download directory carries the partial
    /// marker extension
    ///
    /// The browser downloads under a temporary name of its own choosing, so
    /// the whole directory is scanned rather than one expected path. The
    /// marker only appears after the download actually starts, so the first
    /// check is delayed one interval.
    async fn poll_download_complete(&self) -> PollOutcome {
        let timeouts = self.session.timeouts();
        let dir = PathBuf::from(&self.download.dir);
        let watcher = PollWatcher::with_deadline(
            timeouts.download_poll_interval(),
            timeouts.download_timeout(),
        )
        .delay_first();

        let dir_ref = &dir;
        let extension = self.download.partial_extension.as_str();
        watcher
            .poll(move || async move {
                if partial_download_present(dir_ref, extension).await {
                    PollDecision::Continue
                } else {
                    PollDecision::Done
                }
            })
            .await
    }

    /// Upload the downloaded artifact under its storage key
    async fn upload_artifact(&mut self) -> Result<()> {
        let path = self.artifact_path();
        let receipt = self
            .store
            .put_object(&self.job.storage_key(), &path)
            .await?;

        self.job.transition(JobState::Uploaded);
        self.notify(&format!(
            "KB export uploaded for {} ({} bytes)",
            self.job.project.name, receipt.bytes
        ))
        .await;
        Ok(())
    }

    /// Remove the local artifact; runs once per job, errors logged only
    async fn cleanup(&mut self) {
        let path = self.artifact_path();
        if self.dry_run {
            tracing::info!(path = %path.display(), "Dry run: keeping local artifact");
            if !self.job.state.is_failure() {
                self.job.transition(JobState::CleanedUp);
            }
            return;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed local artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No local artifact to remove");
            }
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove local artifact"
            ),
        }
        if !self.job.state.is_failure() {
            self.job.transition(JobState::CleanedUp);
        }
    }

    fn artifact_path(&self) -> PathBuf {
        PathBuf::from(&self.download.dir).join(self.job.artifact_file_name())
    }

    async fn notify(&self, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            tracing::warn!(error = %e, "Notification failed");
        }
    }
}

/// Whether any entry in `dir` still carries the partial-download extension
///
/// An unreadable directory counts as a download still in flight.
async fn partial_download_present(dir: &Path, extension: &str) -> bool {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return true,
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry.file_name().to_string_lossy().ends_with(extension) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::portal::testing::MockDriver;
    use crate::adapters::storage::UploadReceipt;
    use crate::config::{secret_string, PortalConfig, TimeoutsConfig};
    use crate::domain::ids::ProjectId;
    use crate::domain::KbackupError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Mutex;

    const BASE: &str = "https://portal.example.com/vportal";

    struct RecordingStore {
        uploads: Mutex<Vec<(String, PathBuf)>>,
        fail_with: Option<u16>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_with: Some(status),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put_object(&self, key: &str, path: &Path) -> Result<UploadReceipt> {
            if let Some(status) = self.fail_with {
                return Err(KbackupError::Storage(
                    crate::domain::StorageError::UploadFailed {
                        status,
                        message: "denied".to_string(),
                    },
                ));
            }
            self.uploads
                .lock()
                .unwrap()
                .push((key.to_string(), path.to_path_buf()));
            Ok(UploadReceipt {
                bucket: "test".to_string(),
                key: key.to_string(),
                bytes: 42,
                etag: None,
            })
        }
    }

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }
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
            export_timeout_secs: 5,
            summary_load_timeout_secs: 2,
            download_poll_interval_secs: 1,
            download_timeout_secs: 3,
        }
    }

    fn portal_config() -> PortalConfig {
        PortalConfig {
            base_url: BASE.to_string(),
            display_name: "Test".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            username: Some("bot".to_string()),
            password: Some(secret_string("pw".to_string())),
        }
    }

    /// Driver arranged so the whole pipeline can run without a real portal:
    /// authenticated redirect, idle flags clear, status page terminal.
    fn scripted_driver() -> Arc<MockDriver> {
        let driver = Arc::new(MockDriver::new());
        driver.set_redirect(BASE, &format!("{BASE}/viewProjectList.html"));
        driver.set_script_result(pages::LOADING_FLAG_SCRIPT, json!(false));
        driver.set_script_result(pages::OBJECT_LOADED_FLAG_SCRIPT, json!(false));
        driver.queue_page_texts("isKBExportProcessed", &["Success"]);
        driver
    }

    fn controller_over(
        driver: Arc<MockDriver>,
        store: Arc<dyn ObjectStore>,
        notifier: Arc<RecordingNotifier>,
        download_dir: &Path,
    ) -> ExportJobController {
        let session = Arc::new(
            PortalSession::new(driver, &portal_config(), fast_timeouts()).unwrap(),
        );
        let download = DownloadConfig {
            dir: download_dir.display().to_string(),
            partial_extension: ".crdownload".to_string(),
        };
        ExportJobController::new(
            session,
            store,
            notifier,
            download,
            false,
            Project::new(ProjectId::new(101), "Acme"),
        )
    }

    fn export_list_body(controller: &ExportJobController) -> String {
        format!(
            r#"{{"rows": [{{"fileNm": "other.xml", "kbExportId": 9}}, {{"fileNm": "{}", "kbExportId": 55}}]}}"#,
            controller.job.artifact_file_name()
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_pipeline_success() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller =
            controller_over(driver.clone(), store.clone(), notifier.clone(), dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        // Download completes immediately: marker never exists, final file does.
        std::fs::write(
            dir.path().join(controller.job.artifact_file_name()),
            b"<kb/>",
        )
        .unwrap();
        let expected_key = controller.job.storage_key();

        let outcome = controller.run().await;

        assert!(outcome.is_success(), "outcome: {:?}", outcome.error);
        assert_eq!(outcome.final_state, JobState::CleanedUp);

        let scripts = driver.executed_scripts();
        assert!(scripts.contains(&pages::save_export_script().to_string()));
        assert!(scripts.contains(&"downloadKbExport('#kbExportSummary',55);".to_string()));

        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, expected_key);

        // Artifact removed by cleanup.
        let file_name = expected_key.split('/').next_back().unwrap();
        assert!(!dir.path().join(file_name).exists());

        let messages = notifier.messages.lock().unwrap();
        assert!(messages.iter().any(|m| m.contains("generated")));
        assert!(messages.iter().any(|m| m.contains("uploaded")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_opens_summary_tab_before_detail_tab() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver.clone(), store, notifier, dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        std::fs::write(
            dir.path().join(controller.job.artifact_file_name()),
            b"<kb/>",
        )
        .unwrap();

        let outcome = controller.run().await;
        assert!(outcome.is_success(), "outcome: {:?}", outcome.error);

        let scripts = driver.executed_scripts();
        let summary = scripts
            .iter()
            .position(|s| s.as_str() == pages::open_export_summary_script())
            .unwrap();
        let detail = scripts
            .iter()
            .position(|s| s.as_str() == pages::open_export_detail_script())
            .unwrap();
        assert!(summary < detail, "summary tab must open before the detail tab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_skips_upload_and_keeps_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut controller =
            controller_over(driver.clone(), store.clone(), notifier, dir.path());
        controller.dry_run = true;

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        let artifact = dir.path().join(controller.job.artifact_file_name());
        std::fs::write(&artifact, b"<kb/>").unwrap();

        let outcome = controller.run().await;

        assert!(outcome.is_success());
        assert!(store.uploads.lock().unwrap().is_empty());
        assert!(artifact.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_timeout_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        driver.queue_page_texts("isKBExportProcessed", &["still running"]);
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver, store.clone(), notifier.clone(), dir.path());

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::ExportFailed);
        assert!(outcome.error.as_deref().unwrap_or("").contains("timed out"));
        assert!(store.uploads.lock().unwrap().is_empty());
        assert!(notifier
            .messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains("FAILED")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_invalidation_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        driver.queue_page_texts(
            "isKBExportProcessed",
            &["An error has occurred OR your session has been invalidated due to login on other browser/system."],
        );
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver, store, notifier, dir.path());

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::ExportFailed);
        assert!(outcome
            .error
            .as_deref()
            .unwrap_or("")
            .contains("Session invalidated"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_export_row_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        driver.queue_page_texts(
            "getAllKbExportList",
            &[r#"{"rows": [{"fileNm": "unrelated.xml", "kbExportId": 9}]}"#],
        );
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver, store.clone(), notifier, dir.path());

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::ExportFailed);
        assert!(outcome
            .error
            .as_deref()
            .unwrap_or("")
            .contains("Export id not found"));
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_timeout_fails_job() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver.clone(), store, notifier, dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        // Partial marker present and never removed.
        std::fs::write(
            dir.path().join(format!(
                "{}.crdownload",
                controller.job.artifact_file_name()
            )),
            b"",
        )
        .unwrap();

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::DownloadFailed);
        assert!(outcome
            .error
            .as_deref()
            .unwrap_or("")
            .contains("Download timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_partial_file_blocks_download_completion() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver.clone(), store.clone(), notifier, dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        // The browser downloads under a temporary name of its own choosing;
        // this one never clears, so the wait must time out even though the
        // expected final file is already on disk.
        std::fs::write(dir.path().join("Unconfirmed 123456.crdownload"), b"").unwrap();
        std::fs::write(
            dir.path().join(controller.job.artifact_file_name()),
            b"<kb/>",
        )
        .unwrap();

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::DownloadFailed);
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_wait_completes_once_partials_clear() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver, store, notifier, dir.path());

        // Present at the first check, gone by the second.
        let marker = dir.path().join("Unconfirmed 42.crdownload");
        std::fs::write(&marker, b"").unwrap();
        let cleared = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            std::fs::remove_file(&marker).unwrap();
        });

        let outcome = controller.poll_download_complete().await;
        cleared.await.unwrap();

        assert_eq!(outcome, PollOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_final_file_is_not_fatal_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver.clone(), store.clone(), notifier, dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        // No partial markers and no final file: the wait completes and the
        // job still proceeds to upload with the expected path.
        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::CleanedUp);
        assert_eq!(store.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_fails_job_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let driver = scripted_driver();
        let store = Arc::new(RecordingStore::failing(403));
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller_over(driver.clone(), store, notifier, dir.path());

        driver.queue_page_texts("getAllKbExportList", &[&export_list_body(&controller)]);
        let artifact = dir.path().join(controller.job.artifact_file_name());
        std::fs::write(&artifact, b"<kb/>").unwrap();

        let outcome = controller.run().await;

        assert_eq!(outcome.final_state, JobState::UploadFailed);
        // Cleanup still removed the local file.
        assert!(!artifact.exists());
    }
}
