//! Object store trait definition

use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// Receipt for a completed upload
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Bucket the object landed in
    pub bucket: String,

    /// Full object key
    pub key: String,

    /// Bytes uploaded
    pub bytes: u64,

    /// ETag returned by the store, when present
    pub etag: Option<String>,
}

/// Destination for exported artifacts
///
/// Implementations upload a local file under a caller-chosen key. The
/// pipeline only needs put semantics; listing and retrieval stay out of
/// the trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `path` under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the store rejects
    /// the upload.
    async fn put_object(&self, key: &str, path: &Path) -> Result<UploadReceipt>;
}
