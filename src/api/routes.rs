//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{create_link_handler, link_list_handler, link_report_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /links`         - The caller's links with analytics (paginated)
/// - `POST /links`         - Create a short link
/// - `GET  /links/{code}`  - Analytics report for one link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(link_list_handler).post(create_link_handler))
        .route("/links/{code}", get(link_report_handler))
}
