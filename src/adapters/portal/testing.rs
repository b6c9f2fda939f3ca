//! Test double for the portal driver
//!
//! `MockDriver` is a scriptable in-memory [`PortalDriver`] used by the
//! session, controller, and batch tests. It records every interaction and
//! serves configured responses: per-script results or failures, per-URL page
//! text (optionally as a queue that advances on each read), element
//! presence, and navigation redirects.
//!
//! Available in unit tests and, with the `testing` feature, to integration
//! tests.

use crate::adapters::portal::driver::PortalDriver;
use crate::domain::{PortalError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    current_url: String,
    redirects: HashMap<String, String>,
    script_results: HashMap<String, Value>,
    script_failures: HashMap<String, String>,
    page_text: String,
    page_texts_by_url: HashMap<String, VecDeque<String>>,
    present: HashMap<String, bool>,
    executed: Vec<String>,
    navigated: Vec<String>,
    filled: HashMap<String, String>,
    enter_pressed: Vec<String>,
    refresh_count: usize,
}

/// Scriptable in-memory portal driver
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL the browser currently shows
    pub fn set_current_url(&self, url: &str) {
        self.state.lock().unwrap().current_url = url.to_string();
    }

    /// Make navigation to a URL land on a different URL (portal redirect)
    pub fn set_redirect(&self, navigated_to: &str, lands_on: &str) {
        self.state
            .lock()
            .unwrap()
            .redirects
            .insert(navigated_to.to_string(), lands_on.to_string());
    }

    /// Serve a value for an executed script
    pub fn set_script_result(&self, script: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .script_results
            .insert(script.to_string(), value);
    }

    /// Fail a specific script with a message
    pub fn fail_script(&self, script: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .script_failures
            .insert(script.to_string(), message.to_string());
    }

    /// Default page text returned when no per-URL text matches
    pub fn set_page_text(&self, text: &str) {
        self.state.lock().unwrap().page_text = text.to_string();
    }

    /// Queue page texts for URLs containing `url_fragment`; the queue
    /// advances on each read and the final entry repeats
    pub fn queue_page_texts(&self, url_fragment: &str, texts: &[&str]) {
        self.state.lock().unwrap().page_texts_by_url.insert(
            url_fragment.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
    }

    /// Set whether a CSS selector currently matches an element
    pub fn set_present(&self, css_selector: &str, present: bool) {
        self.state
            .lock()
            .unwrap()
            .present
            .insert(css_selector.to_string(), present);
    }

    /// Every script executed, in order
    pub fn executed_scripts(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Every URL navigated to, in order
    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigated.clone()
    }

    /// Values typed into inputs, by element id
    pub fn filled_values(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().filled.clone()
    }

    /// Element ids that received an Enter keypress
    pub fn enter_pressed(&self) -> Vec<String> {
        self.state.lock().unwrap().enter_pressed.clone()
    }

    /// How many times the page was reloaded
    pub fn refresh_count(&self) -> usize {
        self.state.lock().unwrap().refresh_count
    }
}

#[async_trait]
impl PortalDriver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.navigated.push(url.to_string());
        state.current_url = state
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().current_url.clone())
    }

    async fn page_text(&self) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        let url = state.current_url.clone();
        let matched = state
            .page_texts_by_url
            .iter()
            .find(|(fragment, _)| url.contains(*fragment))
            .map(|(fragment, _)| fragment.clone());
        if let Some(fragment) = matched {
            let queue = state.page_texts_by_url.get_mut(&fragment).unwrap();
            let text = if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap_or_default()
            };
            return Ok(text);
        }
        Ok(state.page_text.clone())
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(script.to_string());
        if let Some(message) = state.script_failures.get(script) {
            return Err(PortalError::ActionFailed(message.clone()).into());
        }
        Ok(state
            .script_results
            .get(script)
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn fill(&self, element_id: &str, text: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .filled
            .insert(element_id.to_string(), text.to_string());
        Ok(())
    }

    async fn press_enter(&self, element_id: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .enter_pressed
            .push(element_id.to_string());
        Ok(())
    }

    async fn is_present(&self, css_selector: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .present
            .get(css_selector)
            .copied()
            .unwrap_or(false))
    }

    async fn refresh(&self) -> Result<()> {
        self.state.lock().unwrap().refresh_count += 1;
        Ok(())
    }
}
