//! User registration backend
//!
//! Accepts a registration form with an image, stores the image in S3 and
//! records the user in PostgreSQL.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// S3 image storage
pub mod media_storage;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Configuration and error types
pub mod types;
