//! Browser driver capability trait
//!
//! `PortalDriver` is the boundary between the workflow and the mechanics of
//! driving a real browser. The session and controller only ever see these
//! primitives; how a specific page's DOM is reached is the driver's concern.

use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Capability interface over an automated browser
///
/// Implementations must be safe to share behind an `Arc`: the remote browser
/// holds all mutable state, so every method takes `&self`.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    /// Navigate the browser to the given URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// The URL the browser currently shows
    async fn current_url(&self) -> Result<String>;

    /// Visible text of the current page body
    async fn page_text(&self) -> Result<String>;

    /// Execute a script in the page context and return its value
    async fn execute(&self, script: &str) -> Result<Value>;

    /// Clear a text input (by element id) and type into it
    async fn fill(&self, element_id: &str, text: &str) -> Result<()>;

    /// Send the Enter key to an element (by element id)
    async fn press_enter(&self, element_id: &str) -> Result<()>;

    /// Whether an element matching the CSS selector exists on the page
    async fn is_present(&self, css_selector: &str) -> Result<bool>;

    /// Reload the current page
    async fn refresh(&self) -> Result<()>;
}
