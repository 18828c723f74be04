//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    create_link_form_handler, dashboard_handler, home_handler, login_handler,
    login_submit_handler, logout_handler, signup_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Dashboard routes requiring a cookie session.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /dashboard`        - Links, analytics and the creation form
/// - `POST /dashboard/links`  - Creation form submission
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/dashboard/links", post(create_link_form_handler))
}

/// Public pages.
///
/// # Endpoints
///
/// - `GET  /`        - Home page with one-shot notices
/// - `GET  /login`   - Token sign-in form
/// - `POST /login`   - Start a session
/// - `POST /logout`  - End the session
/// - `GET  /signup`  - How to obtain an account
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
        .route("/signup", get(signup_handler))
}
