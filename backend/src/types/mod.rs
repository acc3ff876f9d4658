mod config;
mod environment;
mod error;

pub use config::{AppConfig, ConfigError};
pub use environment::Environment;
pub use error::{ApiErrorResponse, AppError};
