//! Registration storage services
//!
//! This crate owns the relational side of the registration service: the `users`
//! schema, the user record model and the scoped session handling around it.

pub mod user;
