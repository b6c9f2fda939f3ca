//! Object storage adapter
//!
//! Ships downloaded artifacts to an S3-compatible bucket.

pub mod s3;
mod sigv4;
pub mod traits;

pub use s3::S3Client;
pub use traits::{ObjectStore, UploadReceipt};
