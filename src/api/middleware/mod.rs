//! HTTP middleware shared by the API and the public routes.
//!
//! - [`auth`] - Bearer token authentication for `/api`
//! - [`rate_limit`] - Per-IP token buckets
//! - [`tracing`] - Request spans and response logging

pub mod auth;
pub mod rate_limit;
pub mod tracing;
