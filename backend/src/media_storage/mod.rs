//! S3-based image storage operations
mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use axum::body::Bytes;
use uuid::Uuid;

pub use error::{BucketError, BucketResult};

/// Object store operations the upload route depends on
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `data` under `blob_name`, replacing any existing blob with that name
    async fn upload(&self, blob_name: &str, content_type: &str, data: Bytes) -> BucketResult<()>;

    /// Public URL of the blob stored under `blob_name`
    fn blob_url(&self, blob_name: &str) -> String;
}

/// Image storage client for S3 operations
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for image storage, assumed to exist
    /// * `public_base_url` - Prefix of public blob URLs, without trailing slash
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String, public_base_url: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url,
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for MediaStorage {
    async fn upload(&self, blob_name: &str, content_type: &str, data: Bytes) -> BucketResult<()> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(blob_name)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await?;

        Ok(())
    }

    fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{blob_name}", self.public_base_url)
    }
}

/// Generates the stored name for an uploaded file as `<uuid>.<extension>`
///
/// The extension is everything after the last `.` of the original filename,
/// kept verbatim. A filename without `.` is used whole as the suffix.
#[must_use]
pub fn generate_blob_name(original_filename: &str) -> String {
    let extension = original_filename
        .rsplit('.')
        .next()
        .unwrap_or(original_filename);

    format!("{}.{extension}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_blob_name(blob_name: &str) -> (Uuid, &str) {
        let (uuid, extension) = blob_name.split_at(36);
        let extension = extension
            .strip_prefix('.')
            .expect("blob name must have a dot after the uuid");
        (Uuid::parse_str(uuid).expect("prefix must be a uuid"), extension)
    }

    #[test]
    fn test_extension_is_preserved_verbatim() {
        let blob_name = generate_blob_name("photo.PNG");
        let (_, extension) = split_blob_name(&blob_name);
        assert_eq!(extension, "PNG");
    }

    #[test]
    fn test_only_last_extension_is_kept() {
        let blob_name = generate_blob_name("archive.tar.gz");
        let (_, extension) = split_blob_name(&blob_name);
        assert_eq!(extension, "gz");
    }

    #[test]
    fn test_filename_without_dot_is_used_whole() {
        let blob_name = generate_blob_name("photo");
        let (_, extension) = split_blob_name(&blob_name);
        assert_eq!(extension, "photo");
    }

    #[test]
    fn test_empty_filename_gives_empty_extension() {
        let blob_name = generate_blob_name("");
        let (_, extension) = split_blob_name(&blob_name);
        assert_eq!(extension, "");

        let blob_name = generate_blob_name("trailing.");
        let (_, extension) = split_blob_name(&blob_name);
        assert_eq!(extension, "");
    }

    #[test]
    fn test_names_are_unique() {
        let first = generate_blob_name("photo.png");
        let second = generate_blob_name("photo.png");
        assert_ne!(first, second);

        let (uuid, _) = split_blob_name(&first);
        assert_eq!(uuid.get_version_num(), 4);
    }
}
