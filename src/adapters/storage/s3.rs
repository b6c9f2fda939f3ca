//! S3 object store client
//!
//! Uploads artifacts with plain HTTPS PUTs signed with SigV4. Virtual-host
//! addressing is used against AWS; an `endpoint` override switches to
//! path-style addressing for S3-compatible stores and test servers.

use crate::adapters::storage::sigv4::{uri_encode_path, RequestSigner};
use crate::adapters::storage::traits::{ObjectStore, UploadReceipt};
use crate::config::StorageConfig;
use crate::domain::{KbackupError, Result, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use secrecy::ExposeSecret;
use std::path::Path;
use std::time::Duration;

const UPLOAD_TIMEOUT_SECONDS: u64 = 300;

/// S3 client scoped to a single bucket
pub struct S3Client {
    http: reqwest::Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    access_key: String,
    secret_key: String,
}

impl S3Client {
    /// Create a client from storage configuration
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client
    /// cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let access_key = config
            .access_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                KbackupError::Storage(StorageError::AuthenticationFailed(
                    "storage.access_key is not set".to_string(),
                ))
            })?;
        let secret_key = config
            .secret_key
            .as_ref()
            .map(|k| k.expose_secret().as_ref().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                KbackupError::Storage(StorageError::AuthenticationFailed(
                    "storage.secret_key is not set".to_string(),
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| {
                KbackupError::Storage(StorageError::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            http,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            access_key,
            secret_key,
        })
    }

    /// Resolve host and URL for a key
    ///
    /// Returns `(host_header_value, full_url, canonical_uri)`.
    fn addressing(&self, key: &str) -> Result<(String, String, String)> {
        match &self.endpoint {
            Some(endpoint) => {
                let parsed = url::Url::parse(endpoint).map_err(|e| {
                    KbackupError::Storage(StorageError::ConnectionFailed(format!(
                        "Invalid storage endpoint {endpoint}: {e}"
                    )))
                })?;
                let host = parsed.host_str().ok_or_else(|| {
                    KbackupError::Storage(StorageError::ConnectionFailed(format!(
                        "Storage endpoint {endpoint} has no host"
                    )))
                })?;
                let host_header = match parsed.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                };
                let canonical_uri = uri_encode_path(&format!("/{}/{key}", self.bucket));
                let url = format!("{}{canonical_uri}", endpoint.trim_end_matches('/'));
                Ok((host_header, url, canonical_uri))
            }
            None => {
                let host = format!("{}.s3.{}.amazonaws.com", self.bucket, self.region);
                let canonical_uri = uri_encode_path(&format!("/{key}"));
                let url = format!("https://{host}{canonical_uri}");
                Ok((host, url, canonical_uri))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(&self, key: &str, path: &Path) -> Result<UploadReceipt> {
        let body = tokio::fs::read(path).await.map_err(|e| {
            KbackupError::Storage(StorageError::ArtifactUnreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        let bytes = body.len() as u64;

        let (host, url, canonical_uri) = self.addressing(key)?;
        let signer = RequestSigner {
            access_key: &self.access_key,
            secret_key: &self.secret_key,
            region: &self.region,
            service: "s3",
        };
        let signed = signer.sign("PUT", &host, &canonical_uri, &body, Utc::now());

        tracing::debug!(bucket = %self.bucket, key = %key, bytes, "Uploading artifact");

        let response = self
            .http
            .put(&url)
            .header("authorization", &signed.authorization)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.payload_hash)
            .header("content-type", "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KbackupError::Storage(StorageError::Timeout(format!(
                        "Upload of {key} timed out: {e}"
                    )))
                } else {
                    KbackupError::Storage(StorageError::ConnectionFailed(format!(
                        "Upload request failed: {e}"
                    )))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KbackupError::Storage(StorageError::UploadFailed {
                status: status.as_u16(),
                message,
            }));
        }

        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());

        tracing::info!(bucket = %self.bucket, key = %key, bytes, "Artifact uploaded");

        Ok(UploadReceipt {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            bytes,
            etag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_config(endpoint: &str) -> StorageConfig {
        StorageConfig {
            bucket: "kb-backups".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some(endpoint.to_string()),
            access_key: Some("AKIDEXAMPLE".to_string()),
            secret_key: Some(secret_string("test-secret".to_string())),
        }
    }

    fn artifact_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_new_requires_credentials() {
        let mut config = test_config("http://localhost:9000");
        config.access_key = None;
        assert!(matches!(
            S3Client::new(&config),
            Err(KbackupError::Storage(StorageError::AuthenticationFailed(_)))
        ));

        let mut config = test_config("http://localhost:9000");
        config.secret_key = None;
        assert!(matches!(
            S3Client::new(&config),
            Err(KbackupError::Storage(StorageError::AuthenticationFailed(_)))
        ));
    }

    #[test]
    fn test_addressing_virtual_host_without_endpoint() {
        let mut config = test_config("unused");
        config.endpoint = None;
        let client = S3Client::new(&config).unwrap();

        let (host, url, uri) = client.addressing("Alpha/file.xml").unwrap();
        assert_eq!(host, "kb-backups.s3.us-east-1.amazonaws.com");
        assert_eq!(uri, "/Alpha/file.xml");
        assert_eq!(
            url,
            "https://kb-backups.s3.us-east-1.amazonaws.com/Alpha/file.xml"
        );
    }

    #[test]
    fn test_addressing_path_style_with_endpoint() {
        let config = test_config("http://127.0.0.1:9000");
        let client = S3Client::new(&config).unwrap();

        let (host, url, uri) = client.addressing("Alpha/My Export.xml").unwrap();
        assert_eq!(host, "127.0.0.1:9000");
        assert_eq!(uri, "/kb-backups/Alpha/My%20Export.xml");
        assert_eq!(url, "http://127.0.0.1:9000/kb-backups/Alpha/My%20Export.xml");
    }

    #[tokio::test]
    async fn test_put_object_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/kb-backups/Alpha/dump.xml")
            .match_header(
                "authorization",
                mockito::Matcher::Regex("^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/".to_string()),
            )
            .match_header("x-amz-content-sha256", mockito::Matcher::Any)
            .with_status(200)
            .with_header("etag", "\"abc123\"")
            .create_async()
            .await;

        let client = S3Client::new(&test_config(&server.url())).unwrap();
        let file = artifact_with(b"<kb/>");

        let receipt = client.put_object("Alpha/dump.xml", file.path()).await.unwrap();
        assert_eq!(receipt.bucket, "kb-backups");
        assert_eq!(receipt.key, "Alpha/dump.xml");
        assert_eq!(receipt.bytes, 5);
        assert_eq!(receipt.etag.as_deref(), Some("abc123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_object_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/kb-backups/Alpha/dump.xml")
            .with_status(403)
            .with_body("AccessDenied")
            .create_async()
            .await;

        let client = S3Client::new(&test_config(&server.url())).unwrap();
        let file = artifact_with(b"<kb/>");

        let err = client
            .put_object("Alpha/dump.xml", file.path())
            .await
            .unwrap_err();
        match err {
            KbackupError::Storage(StorageError::UploadFailed { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("AccessDenied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_object_missing_file() {
        let client = S3Client::new(&test_config("http://127.0.0.1:9000")).unwrap();
        let err = client
            .put_object("Alpha/dump.xml", Path::new("/nonexistent/dump.xml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KbackupError::Storage(StorageError::ArtifactUnreadable { .. })
        ));
    }
}
