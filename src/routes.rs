//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /health`      - Health check (public)
//! - `/`, `/login`, `/logout`, `/signup` - Public pages
//! - `/api/*`            - REST API (Bearer token required)
//! - `/dashboard*`       - Web UI (cookie session required)
//! - `/static/*`         - Static assets
//!
//! Fixed paths take precedence over `/{code}`, which is why aliases may not
//! use reserved words.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token (API) or cookie session (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Router options that depend on deployment.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Apply per-IP rate limits. Requires connect info unless `behind_proxy`.
    pub rate_limit: bool,
    /// Read the client IP from `X-Forwarded-For` / `X-Real-IP` instead of
    /// the peer socket address. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

fn limited(router: Router<AppState>, limit: RateLimit, options: RouterOptions) -> Router<AppState> {
    if options.rate_limit {
        rate_limit::apply(router, limit, options.behind_proxy)
    } else {
        router
    }
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state, options))
}

/// All routes and middleware, without path normalization.
pub fn app_routes(state: AppState, options: RouterOptions) -> Router {
    let api_router = limited(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        RateLimit::Secure,
        options,
    );

    let web_protected = limited(
        web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        )),
        RateLimit::Secure,
        options,
    );

    let public = limited(
        web::routes::public_routes()
            .route("/{code}", get(redirect_handler))
            .route("/health", get(health_handler)),
        RateLimit::Public,
        options,
    );

    Router::new()
        .merge(public)
        .merge(web_protected)
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}
