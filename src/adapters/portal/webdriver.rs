//! W3C WebDriver implementation of the portal driver
//!
//! Drives a Chrome instance through a chromedriver endpoint using the W3C
//! WebDriver JSON protocol over HTTP. The session is created with download
//! preferences pointing at the configured download directory so the portal's
//! export files land where the download watcher looks for them.

use crate::adapters::portal::driver::PortalDriver;
use crate::domain::{PortalError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// Key under which the W3C protocol nests element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver Enter key code point
const ENTER_KEY: &str = "\u{E007}";

/// WebDriver-protocol browser driver
pub struct WebDriverClient {
    /// chromedriver endpoint, e.g. `http://localhost:9515`
    endpoint: String,

    /// Active WebDriver session id
    session_id: String,

    /// HTTP client for protocol requests
    client: Client,
}

impl WebDriverClient {
    /// Create a browser session configured to download into `download_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the driver endpoint is unreachable or refuses to
    /// create a session.
    pub async fn connect(endpoint: &str, download_dir: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PortalError::ConnectionFailed(format!("HTTP client build: {e}")))?;

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": ["--no-sandbox", "--disable-dev-shm-usage"],
                        "prefs": {
                            "download.default_directory": download_dir,
                            "download.prompt_for_download": false,
                            "download.directory_upgrade": true,
                            "safebrowsing.enabled": true
                        }
                    }
                }
            }
        });

        let endpoint = endpoint.trim_end_matches('/').to_string();
        let response = client
            .post(format!("{endpoint}/session"))
            .json(&capabilities)
            .send()
            .await
            .map_err(|e| PortalError::ConnectionFailed(format!("WebDriver session: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortalError::InvalidResponse(format!("Session response: {e}")))?;

        if !status.is_success() {
            return Err(PortalError::ConnectionFailed(format!(
                "WebDriver session creation failed: {status} - {body}"
            ))
            .into());
        }

        let session_id = body["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| {
                PortalError::InvalidResponse("Session response missing sessionId".to_string())
            })?
            .to_string();

        tracing::info!(endpoint = %endpoint, "WebDriver session created");

        Ok(Self {
            endpoint,
            session_id,
            client,
        })
    }

    /// End the browser session
    ///
    /// Best-effort: a failure only means the browser outlives the run.
    pub async fn quit(&self) {
        let url = self.session_url("");
        if let Err(e) = self.client.delete(&url).send().await {
            tracing::warn!(error = %e, "Failed to end WebDriver session");
        }
    }

    fn session_url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/session/{}", self.endpoint, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.endpoint, self.session_id, path)
        }
    }

    /// POST a protocol command and return the `value` field
    async fn command(&self, path: &str, payload: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.session_url(path))
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortalError::ConnectionFailed(format!("WebDriver request: {e}")))?;

        Self::unwrap_value(path, response.status(), response.json().await.ok()).map_err(Into::into)
    }

    /// GET a protocol resource and return the `value` field
    async fn fetch(&self, path: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.session_url(path))
            .send()
            .await
            .map_err(|e| PortalError::ConnectionFailed(format!("WebDriver request: {e}")))?;

        Self::unwrap_value(path, response.status(), response.json().await.ok()).map_err(Into::into)
    }

    fn unwrap_value(
        path: &str,
        status: StatusCode,
        body: Option<Value>,
    ) -> std::result::Result<Value, PortalError> {
        let body = body.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(body["value"].clone())
        } else {
            let message = body["value"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            Err(PortalError::ActionFailed(format!(
                "WebDriver command '{path}' failed: {status} - {message}"
            )))
        }
    }

    /// Find an element by CSS selector and return its protocol reference
    async fn find_element(&self, css_selector: &str) -> Result<String> {
        let value = self
            .command(
                "element",
                json!({"using": "css selector", "value": css_selector}),
            )
            .await?;
        value[ELEMENT_KEY]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                PortalError::InvalidResponse(format!(
                    "Element response missing reference for '{css_selector}'"
                ))
                .into()
            })
    }
}

#[async_trait]
impl PortalDriver for WebDriverClient {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.command("url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.fetch("url").await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PortalError::InvalidResponse("Current URL not a string".into()).into())
    }

    async fn page_text(&self) -> Result<String> {
        let value = self.execute("return document.body.innerText;").await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PortalError::InvalidResponse("Page text not a string".into()).into())
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        self.command("execute/sync", json!({"script": script, "args": []}))
            .await
    }

    async fn fill(&self, element_id: &str, text: &str) -> Result<()> {
        let element = self.find_element(&format!("#{element_id}")).await?;
        self.command(&format!("element/{element}/clear"), json!({}))
            .await?;
        self.command(
            &format!("element/{element}/value"),
            json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    async fn press_enter(&self, element_id: &str) -> Result<()> {
        let element = self.find_element(&format!("#{element_id}")).await?;
        self.command(
            &format!("element/{element}/value"),
            json!({ "text": ENTER_KEY }),
        )
        .await?;
        Ok(())
    }

    async fn is_present(&self, css_selector: &str) -> Result<bool> {
        let response = self
            .client
            .post(self.session_url("element"))
            .json(&json!({"using": "css selector", "value": css_selector}))
            .send()
            .await
            .map_err(|e| PortalError::ConnectionFailed(format!("WebDriver request: {e}")))?;

        // "no such element" comes back as 404; anything else non-2xx is a
        // real failure.
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(PortalError::ActionFailed(format!(
                "Element lookup for '{css_selector}' failed: {status}"
            ))
            .into()),
        }
    }

    async fn refresh(&self) -> Result<()> {
        self.command("refresh", json!({})).await?;
        Ok(())
    }
}
