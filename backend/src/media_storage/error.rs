//! Error types for bucket operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::put_object::PutObjectError,
};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),
}

impl From<SdkError<PutObjectError>> for BucketError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::S3Error(DisplayErrorContext(&error).to_string())
    }
}
