//! Process configuration, read once at startup

use std::env;
use std::str::FromStr;
use std::time::Duration;

use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region};
use thiserror::Error;

use super::Environment;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_BLOB_CONTAINER: &str = "images";
const DEFAULT_REGION: &str = "us-east-1";
/// 10 MiB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading the configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

/// Application configuration shared by the server components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment stage
    pub environment: Environment,
    /// Port the HTTP server listens on
    pub port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Bucket holding uploaded images
    pub blob_container: String,
    /// Object store endpoint override, `None` for the regular AWS endpoint
    pub blob_endpoint: Option<String>,
    /// Region of the object store
    pub region: String,
    /// Prefix of every public blob URL, without trailing slash
    pub blob_public_base_url: String,
    /// Maximum accepted request body on the upload route
    pub max_upload_bytes: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration for the given environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a variable without default is unset and
    /// `ConfigError::Invalid` if a numeric variable does not parse
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => environment
                .default_database_url()
                .map(ToString::to_string)
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
        };

        let blob_container =
            env::var("BLOB_CONTAINER_NAME").unwrap_or_else(|_| DEFAULT_BLOB_CONTAINER.to_string());
        let blob_endpoint = env::var("BLOB_STORAGE_ENDPOINT")
            .ok()
            .or_else(|| environment.default_blob_endpoint().map(ToString::to_string))
            .map(|endpoint| endpoint.trim_end_matches('/').to_string());
        let region = env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());

        let blob_public_base_url = env::var("BLOB_PUBLIC_BASE_URL").map_or_else(
            |_| public_base_url(blob_endpoint.as_deref(), &blob_container, &region),
            |url| url.trim_end_matches('/').to_string(),
        );

        Ok(Self {
            environment,
            port: parse_var("PORT", DEFAULT_PORT)?,
            database_url,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            blob_container,
            blob_endpoint,
            region,
            blob_public_base_url,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            request_timeout: Duration::from_secs(parse_var(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        })
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = &self.blob_endpoint {
            loader = loader.endpoint_url(endpoint_url);
        }

        let aws_config = loader.load().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.environment.force_path_style() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}

/// Public URL prefix of blobs in `container`
fn public_base_url(endpoint: Option<&str>, container: &str, region: &str) -> String {
    endpoint.map_or_else(
        || format!("https://{container}.s3.{region}.amazonaws.com"),
        |endpoint| format!("{endpoint}/{container}"),
    )
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
