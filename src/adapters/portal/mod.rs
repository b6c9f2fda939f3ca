//! Portal automation adapter
//!
//! Drives the knowledge-base portal through a WebDriver-compatible browser:
//! low-level protocol client, page constants and scripts, response models,
//! and the stateful session facade the export pipeline talks to.

pub mod driver;
pub mod models;
pub mod pages;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod webdriver;

pub use driver::PortalDriver;
pub use models::{ExportRow, ExportStatus, ProjectRow};
pub use session::PortalSession;
pub use webdriver::WebDriverClient;
