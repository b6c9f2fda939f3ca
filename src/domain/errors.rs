//! Domain error types
//!
//! This module defines the error hierarchy for kbackup. All errors are
//! domain-specific and don't expose third-party types. The batch orchestrator
//! uses these types to decide, per failure, whether to abort the current
//! project's job or the whole run.

use thiserror::Error;

/// Main kbackup error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum KbackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Portal-related errors
    #[error("Portal error: {0}")]
    Portal(#[from] PortalError),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Export workflow errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Notification delivery errors (silent-degraded, logged only)
    #[error("Notification error: {0}")]
    Notification(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Portal-specific errors
///
/// Errors that occur when driving the remote portal. These errors don't
/// expose WebDriver or HTTP client types. All variants are recoverable at
/// the batch level: they end the current project's job only.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Failed to reach the portal or the browser driver
    #[error("Failed to connect to portal: {0}")]
    ConnectionFailed(String),

    /// Login did not reach an authenticated state
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Project could not be opened (not found or rejected)
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// In-page script execution was rejected
    #[error("Remote action failed: {0}")]
    ActionFailed(String),

    /// The export job never reached a terminal status within the budget
    #[error("Export timed out: {0}")]
    ExportTimeout(String),

    /// The portal reported the session invalidated mid-poll
    #[error("Session invalidated: {0}")]
    SessionInvalidated(String),

    /// No export-list row matched the generated artifact name
    #[error("Export id not found: {0}")]
    ExportIdNotFound(String),

    /// The asynchronous file download never completed within the budget
    #[error("Download timed out: {0}")]
    DownloadTimeout(String),

    /// A JSON-bearing page could not be parsed
    #[error("Invalid response from portal: {0}")]
    InvalidResponse(String),
}

/// Object-storage-specific errors
///
/// Errors that occur when uploading artifacts. These don't expose the HTTP
/// client types used by the storage implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to reach the storage endpoint
    #[error("Failed to connect to object storage: {0}")]
    ConnectionFailed(String),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The local artifact could not be read
    #[error("Failed to read artifact {path}: {message}")]
    ArtifactUnreadable { path: String, message: String },

    /// The storage service rejected the upload
    #[error("Upload failed: {status} - {message}")]
    UploadFailed { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for KbackupError {
    fn from(err: std::io::Error) -> Self {
        KbackupError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for KbackupError {
    fn from(err: serde_json::Error) -> Self {
        KbackupError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for KbackupError {
    fn from(err: toml::de::Error) -> Self {
        KbackupError::Configuration(format!("TOML parse error: {err}"))
    }
}
