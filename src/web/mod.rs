//! Web layer for browser-based UI.
//!
//! Provides the home page, token sign-in and the analytics dashboard.
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie session authentication
//! - [`notice`] - One-shot notices passed through redirects
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod middleware;
pub mod notice;
pub mod routes;
