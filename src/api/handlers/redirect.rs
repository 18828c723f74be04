//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::error;

use crate::application::services::RedirectOutcome;
use crate::state::AppState;
use crate::web::notice::Notice;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code
/// 2. Reject expired links without recording anything
/// 3. Check the destination can be sent as `Location`
/// 4. Classify the client from `User-Agent`
/// 5. Record the click atomically
/// 6. Return 307 Temporary Redirect
///
/// Unknown codes, expired links, unusable destinations and store failures
/// send the visitor home with a `303 See Other` to
/// `/?notice=not_found|expired|error`.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let notice = match state
        .redirect_service
        .resolve(&code, user_agent, Utc::now())
        .await
    {
        Ok(RedirectOutcome::Forward { location }) => {
            return (
                StatusCode::TEMPORARY_REDIRECT,
                [(header::LOCATION, location)],
            )
                .into_response();
        }
        Ok(RedirectOutcome::NotFound) => Notice::NotFound,
        Ok(RedirectOutcome::Expired) => Notice::Expired,
        Err(e) => {
            error!(code, error = %e, "Failed to resolve short code");
            Notice::RedirectError
        }
    };

    notice.redirect_to("/").into_response()
}
