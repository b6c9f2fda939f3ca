//! Notifier trait definition

use crate::domain::Result;
use async_trait::async_trait;

/// Sink for human-readable progress messages
///
/// Delivery failures are reported as errors but callers treat them as
/// advisory: a lost message never fails a backup.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Notifier that drops every message, used when notifications are disabled
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}
