//! In-memory blob store for tests

use std::collections::HashMap;

use axum::body::Bytes;
use tokio::sync::Mutex;

use super::{BlobStore, BucketError, BucketResult};

/// Public URL prefix of blobs held by the in-memory store
pub const MOCK_PUBLIC_BASE_URL: &str = "http://localhost:4566/images";

/// Blob stored in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Declared content type
    pub content_type: String,
    /// Raw bytes
    pub data: Bytes,
}

/// Blob store keeping uploads in memory
#[derive(Default)]
pub struct InMemoryMediaStorage {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    fail_uploads: bool,
}

impl InMemoryMediaStorage {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose uploads always fail
    #[must_use]
    pub fn failing() -> Self {
        Self {
            blobs: Mutex::default(),
            fail_uploads: true,
        }
    }

    /// Number of stored blobs
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    /// Whether no blob has been stored
    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }

    /// Blob stored under `blob_name`, if any
    pub async fn get(&self, blob_name: &str) -> Option<StoredBlob> {
        self.blobs.lock().await.get(blob_name).cloned()
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryMediaStorage {
    async fn upload(&self, blob_name: &str, content_type: &str, data: Bytes) -> BucketResult<()> {
        if self.fail_uploads {
            return Err(BucketError::S3Error(
                "dispatch failure: connection refused".to_string(),
            ));
        }

        self.blobs.lock().await.insert(
            blob_name.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    fn blob_url(&self, blob_name: &str) -> String {
        format!("{MOCK_PUBLIC_BASE_URL}/{blob_name}")
    }
}
