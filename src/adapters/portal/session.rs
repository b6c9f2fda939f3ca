//! Authenticated portal session
//!
//! `PortalSession` owns one logical authenticated connection to the portal
//! and provides the workflow's primitives: login, project switching,
//! idle-waiting, script execution, logout, and the JSON/status page reads.
//! The portal scopes "current project" per session, so the batch owns
//! exactly one of these and projects never interleave within it.
//!
//! Every operation that changes server-side state is followed by an
//! idle-wait before the next operation is safe to issue; the portal exposes
//! no event mechanism, only the in-page busy flags.

use crate::adapters::portal::driver::PortalDriver;
use crate::adapters::portal::models::{self, ExportRow, ExportStatus};
use crate::adapters::portal::pages;
use crate::config::{PortalConfig, TimeoutsConfig};
use crate::core::poll::{PollDecision, PollOutcome, PollWatcher};
use crate::domain::ids::ProjectId;
use crate::domain::project::Project;
use crate::domain::{KbackupError, PortalError, Result};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

/// Settle delay after the login page reports ready
const LOGIN_SETTLE: Duration = Duration::from_secs(5);

/// Interval for element-presence waits (login readiness, summary load)
const PRESENCE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// One authenticated portal connection
pub struct PortalSession {
    driver: Arc<dyn PortalDriver>,
    base_url: String,
    username: String,
    password: secrecy::Secret<crate::config::SecretValue>,
    timeouts: TimeoutsConfig,
}

impl PortalSession {
    /// Create a session over a driver
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials are absent (load-time
    /// validation normally guarantees them).
    pub fn new(
        driver: Arc<dyn PortalDriver>,
        portal: &PortalConfig,
        timeouts: TimeoutsConfig,
    ) -> Result<Self> {
        let username = portal
            .username
            .clone()
            .ok_or_else(|| KbackupError::Configuration("portal.username missing".into()))?;
        let password = portal
            .password
            .clone()
            .ok_or_else(|| KbackupError::Configuration("portal.password missing".into()))?;

        Ok(Self {
            driver,
            base_url: portal.base_url.trim_end_matches('/').to_string(),
            username,
            password,
            timeouts,
        })
    }

    /// Establish (or re-establish) authenticated state
    ///
    /// Idempotent: if the browser is not on the login page, the session is
    /// assumed authenticated and this is a no-op. Otherwise the login form
    /// is filled and submitted, then the call blocks until the post-login
    /// loading indicator is absent or the bounded wait elapses.
    pub async fn login(&self) -> Result<()> {
        let current = self.driver.current_url().await.unwrap_or_default();
        if !current.contains(pages::LOGIN_PAGE) {
            self.driver.navigate(&self.base_url).await?;
            let landed = self.driver.current_url().await?;
            if !landed.contains(pages::LOGIN_PAGE) {
                tracing::debug!("Session already authenticated");
                return Ok(());
            }
        }

        self.driver
            .fill(pages::USERNAME_FIELD, &self.username)
            .await
            .map_err(|e| PortalError::LoginFailed(format!("Username field: {e}")))?;
        self.driver
            .fill(pages::PASSWORD_FIELD, self.password.expose_secret().as_ref())
            .await
            .map_err(|e| PortalError::LoginFailed(format!("Password field: {e}")))?;
        self.driver
            .press_enter(pages::PASSWORD_FIELD)
            .await
            .map_err(|e| PortalError::LoginFailed(format!("Submit: {e}")))?;

        let ready = self
            .wait_absent(pages::LOADING_INDICATOR, self.timeouts.login_wait())
            .await;
        if ready == PollOutcome::TimedOut {
            return Err(PortalError::LoginFailed(
                "Post-login loading indicator never cleared".to_string(),
            )
            .into());
        }
        tokio::time::sleep(LOGIN_SETTLE).await;

        tracing::info!("Portal login successful");
        Ok(())
    }

    /// Switch the session's project context
    ///
    /// Requires an authenticated session. Rejection by the portal (project
    /// not found) is recoverable: the caller must treat it as fatal only to
    /// the current job.
    pub async fn open_project(&self, id: ProjectId) -> Result<()> {
        let current = self.driver.current_url().await.unwrap_or_default();
        if !current.contains(pages::PROJECT_LIST_PAGE)
            && !current.contains(pages::LOGIN_SUCCESS_PAGE)
        {
            tracing::debug!(project_id = %id, url = %current, "Not on a project-list page, skipping open");
            return Ok(());
        }

        self.driver
            .execute(&pages::open_project_script(id))
            .await
            .map_err(|e| PortalError::ProjectNotFound(format!("Project {id}: {e}")))?;
        self.await_idle().await;
        tracing::info!(project_id = %id, "Project opened");
        Ok(())
    }

    /// Wait for the in-page busy flags to clear
    ///
    /// Polls the `loadActiveTabFlag` and `isObjectLoaded` indicators every
    /// `idle_poll_interval`, at most `idle_max_polls` times. A flag read
    /// error or a `null` flag counts as still busy; the wait fails open
    /// toward waiting, never toward proceeding early. The iteration cap is a
    /// soft budget: hitting it is logged, not an error.
    pub async fn await_idle(&self) {
        let watcher = PollWatcher::with_max_iterations(
            self.timeouts.idle_poll_interval(),
            self.timeouts.idle_max_polls,
        );

        let outcome = watcher
            .poll(|| async {
                let loading = self.read_flag(pages::LOADING_FLAG_SCRIPT).await;
                let loaded = self.read_flag(pages::OBJECT_LOADED_FLAG_SCRIPT).await;
                if !loading && !loaded {
                    PollDecision::Done
                } else {
                    PollDecision::Continue
                }
            })
            .await;

        if outcome == PollOutcome::TimedOut {
            tracing::warn!(
                max_polls = self.timeouts.idle_max_polls,
                "Idle-wait hit its iteration cap with flags still busy"
            );
        }
    }

    /// Read a busy flag; absent, null, or unreadable means busy
    async fn read_flag(&self, script: &str) -> bool {
        match self.driver.execute(script).await {
            Ok(serde_json::Value::Bool(b)) => b,
            Ok(serde_json::Value::Null) => true,
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Flag read failed, treating as busy");
                true
            }
        }
    }

    /// Execute an arbitrary state-changing in-page command
    pub async fn run_script(&self, script: &str) -> Result<()> {
        self.driver
            .execute(script)
            .await
            .map_err(|e| PortalError::ActionFailed(format!("{script}: {e}")))?;
        Ok(())
    }

    /// Type the artifact name into the export file-name field
    pub async fn set_export_file_name(&self, name: &str) -> Result<()> {
        self.driver
            .fill(pages::EXPORT_FILE_NAME_FIELD, name)
            .await
            .map_err(|e| PortalError::ActionFailed(format!("Export file name field: {e}")))?;
        Ok(())
    }

    /// Navigate to logout; fire-and-forget
    pub async fn logout(&self) {
        let url = pages::page_url(&self.base_url, pages::LOGOUT_PAGE);
        match self.driver.navigate(&url).await {
            Ok(()) => tracing::info!("Logged out"),
            Err(e) => tracing::warn!(error = %e, "Logout navigation failed"),
        }
    }

    /// Fetch the project directory (id to display name)
    ///
    /// Logs in, reads the all-projects JSON page, and logs out. Failure here
    /// is fatal to the batch: no project names can be resolved without it.
    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.login().await?;

        self.driver
            .navigate(&pages::page_url(&self.base_url, pages::ALL_PROJECTS_PAGE))
            .await?;
        let body = self.driver.page_text().await?;
        let rows: Vec<models::ProjectRow> = models::parse_rows(&body)?;
        let projects = rows.into_iter().map(Project::from).collect::<Vec<_>>();

        tracing::info!(count = projects.len(), "Fetched project directory");
        self.logout().await;
        Ok(projects)
    }

    /// List the export jobs of the currently open project
    pub async fn fetch_export_rows(&self) -> Result<Vec<ExportRow>> {
        self.driver
            .navigate(&pages::page_url(&self.base_url, pages::EXPORT_LIST_PAGE))
            .await?;
        let body = self.driver.page_text().await?;
        models::parse_rows(&body)
    }

    /// Navigate to the export status page
    pub async fn open_status_page(&self) -> Result<()> {
        self.driver
            .navigate(&pages::page_url(&self.base_url, pages::EXPORT_STATUS_PAGE))
            .await?;
        Ok(())
    }

    /// Read and classify the export status currently shown
    ///
    /// An unreadable page is reported as in-progress: status polling fails
    /// closed toward continuing, with the read error logged at the call site
    /// through the returned text.
    pub async fn read_export_status(&self) -> ExportStatus {
        match self.driver.page_text().await {
            Ok(body) => ExportStatus::parse(&body),
            Err(e) => ExportStatus::InProgress(format!("status page unreadable: {e}")),
        }
    }

    /// Reload the status page before the next read
    pub async fn refresh_status_page(&self) {
        if let Err(e) = self.driver.refresh().await {
            tracing::debug!(error = %e, "Status page refresh failed");
        }
    }

    /// Bounded wait for an element to be absent from the page
    pub async fn wait_absent(&self, css_selector: &str, deadline: Duration) -> PollOutcome {
        let watcher = PollWatcher::with_deadline(PRESENCE_POLL_INTERVAL, deadline);
        watcher
            .poll(|| async {
                match self.driver.is_present(css_selector).await {
                    Ok(false) => PollDecision::Done,
                    // Present or unreadable: keep waiting.
                    _ => PollDecision::Continue,
                }
            })
            .await
    }

    /// Timeout budgets this session was configured with
    pub fn timeouts(&self) -> &TimeoutsConfig {
        &self.timeouts
    }
}
