//! Domain layer containing business entities and logic.
//!
//! This module is independent of infrastructure concerns. It defines the
//! entities, the repository interfaces the infrastructure layer implements,
//! and visitor classification.
//!
//! # Architecture
//!
//! - [`entities`] - Short links and their analytics document
//! - [`repositories`] - Data access trait definitions
//! - [`client_profile`] - Device and browser classification from a user agent
//!
//! # Redirect Flow
//!
//! 1. HTTP handler receives `GET /{code}`
//! 2. [`crate::application::services::RedirectService`] looks the link up and checks expiry
//! 3. The visitor is classified into a [`client_profile::ClientProfile`]
//! 4. [`repositories::LinkRepository::record_click`] appends the visit atomically
//! 5. The handler answers with a redirect to the original URL

pub mod client_profile;
pub mod entities;
pub mod repositories;
