//! Cookie-based authentication middleware for the web dashboard.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

/// Name of the cookie holding the raw API token.
pub const AUTH_COOKIE: &str = "auth_token";

const SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Reads the `auth_token` value from the `Cookie` header.
///
/// Handles multiple cookies in one header and ignores the others.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(AUTH_COOKIE), Some(value)) if !value.is_empty() => Some(value.to_string()),
                _ => None,
            }
        })
}

/// `Set-Cookie` value establishing a session.
///
/// Returns `None` if the token cannot be carried in a header.
pub fn session_cookie(token: &str, secure: bool) -> Option<HeaderValue> {
    if token.contains([';', ',', ' ']) {
        return None;
    }

    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie).ok()
}

/// `Set-Cookie` value ending the session.
pub fn expired_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("auth_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("auth_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Authenticates dashboard requests using the `auth_token` cookie.
///
/// # Authentication Flow
///
/// 1. Extract `auth_token` cookie from request
/// 2. Resolve it via [`crate::application::services::auth_service::AuthService`]
/// 3. On success, insert the [`crate::domain::entities::CurrentUser`] into
///    request extensions and continue to the handler
/// 4. On failure or missing token, redirect to `/login`
///
/// Unlike the API auth middleware which returns `401 Unauthorized`,
/// this middleware redirects to the login page.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(token) = token_from_cookies(req.headers()) else {
        return Err(Redirect::to("/login"));
    };

    match st.auth_service.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Dashboard session rejected");
            Err(Redirect::to("/login"))
        }
    }
}
