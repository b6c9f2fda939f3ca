//! Portal page paths, element ids, and in-page script builders
//!
//! The portal is driven entirely through page navigation and in-page script
//! execution. Every path, element id, and script the workflow touches lives
//! here so the scraped surface stays in one place.

use crate::domain::ids::{ExportJobId, ProjectId};

/// Login page path fragment, used to detect unauthenticated state
pub const LOGIN_PAGE: &str = "login.html";

/// Pages from which a project can be opened
pub const PROJECT_LIST_PAGE: &str = "viewProjectList.html";
pub const LOGIN_SUCCESS_PAGE: &str = "loginSuccess.html";

/// JSON-bearing page listing all projects
pub const ALL_PROJECTS_PAGE: &str = "getAllProjects.html?";

/// JSON-bearing page listing a project's export jobs
pub const EXPORT_LIST_PAGE: &str = "getAllKbExportList.html?";

/// Plaintext page reporting the running export's status
pub const EXPORT_STATUS_PAGE: &str = "isKBExportProcessed.html?uniqueTabId=contents2";

/// Logout path
pub const LOGOUT_PAGE: &str = "logout.html?myAuthTypeScript=OWN";

/// Element ids on the login form
pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

/// Text input holding the export file name
pub const EXPORT_FILE_NAME_FIELD: &str = "kbExportFileNameId";

/// Post-login busy indicator
pub const LOADING_INDICATOR: &str = ".loading.ui-state-default.ui-state-active";

/// Export-summary loading indicator
pub const SUMMARY_LOADING_INDICATOR: &str = "#load_kbExportSummary";

/// In-page flags polled by the idle-wait
pub const LOADING_FLAG_SCRIPT: &str = "return loadActiveTabFlag;";
pub const OBJECT_LOADED_FLAG_SCRIPT: &str = "return isObjectLoaded;";

/// Script opening a project from the project list
pub fn open_project_script(id: ProjectId) -> String {
    format!("openProjectDB('#gridProjectList',{id})")
}

/// Script opening the export-summary tab
pub fn open_export_summary_script() -> &'static str {
    "openTab('KB Export Summary',null,'kbExportSummary.html',true)"
}

/// Script opening the new-export detail tab
pub fn open_export_detail_script() -> &'static str {
    "openTab('KB Export Detail',null,'kbExportMgmt.html?kbnm=RECOGNITION',true)"
}

/// Script selecting all knowledge-base content for export
pub fn select_all_content_script() -> &'static str {
    "openAttribute('leftSelAll')"
}

/// Script submitting the export with validation bypassed
pub fn save_export_script() -> &'static str {
    "saveKbExport(true)"
}

/// Script triggering the download of a resolved export
pub fn download_export_script(id: ExportJobId) -> String {
    format!("downloadKbExport('#kbExportSummary',{id});")
}

/// Join the portal base URL and a page path
pub fn page_url(base_url: &str, page: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_project_script() {
        assert_eq!(
            open_project_script(ProjectId::new(101)),
            "openProjectDB('#gridProjectList',101)"
        );
    }

    #[test]
    fn test_download_export_script() {
        assert_eq!(
            download_export_script(ExportJobId::new(55)),
            "downloadKbExport('#kbExportSummary',55);"
        );
    }

    #[test]
    fn test_page_url_joins_cleanly() {
        assert_eq!(
            page_url("https://portal.example.com/vportal/", LOGIN_PAGE),
            "https://portal.example.com/vportal/login.html"
        );
        assert_eq!(
            page_url("https://portal.example.com/vportal", LOGOUT_PAGE),
            "https://portal.example.com/vportal/logout.html?myAuthTypeScript=OWN"
        );
    }
}
