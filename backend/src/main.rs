use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use backend::{
    media_storage::MediaStorage,
    server,
    types::{AppConfig, Environment},
};
use registration_storage::user::UserStorage;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, variables may come from the process environment
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    // Use JSON format for staging/production, regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let config = AppConfig::from_env(environment)?;
    tracing::info!(
        ?environment,
        bucket = %config.blob_container,
        "Loaded configuration"
    );

    let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));
    let media_storage = Arc::new(MediaStorage::new(
        s3_client,
        config.blob_container.clone(),
        config.blob_public_base_url.clone(),
    ));

    let user_storage = Arc::new(
        UserStorage::connect(&config.database_url, config.database_max_connections).await?,
    );
    user_storage.ensure_schema().await?;

    server::start(config, media_storage, user_storage).await
}
