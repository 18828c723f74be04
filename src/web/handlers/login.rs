//! Sign-in, sign-out and sign-up pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::NoticeQuery;
use crate::web::middleware::web_auth::{expired_session_cookie, session_cookie};
use crate::web::notice::{Flash, Notice};

/// Template for the login page.
///
/// Renders `templates/login.html` with a token input form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    flash: Option<Flash>,
}

#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
struct SignupTemplate {}

/// Submitted login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login`
pub async fn login_handler(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    LoginTemplate {
        flash: Flash::from_query(query.notice.as_deref()),
    }
}

/// Validates the submitted token and starts a cookie session.
///
/// # Endpoint
///
/// `POST /login`
///
/// On success sets an `HttpOnly` `auth_token` cookie and redirects to
/// `/dashboard`. An unknown or revoked token redirects back to
/// `/login?notice=invalid_token`.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = form.token.trim();

    match state.auth_service.authenticate(token).await {
        Ok(user) => match session_cookie(token, state.cookie_secure) {
            Some(cookie) => {
                info!(owner = %user.owner_id, "Dashboard sign-in");
                ([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response()
            }
            None => Notice::InvalidToken.redirect_to("/login").into_response(),
        },
        Err(AppError::Unauthorized { .. }) => {
            Notice::InvalidToken.redirect_to("/login").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Sign-in failed");
            Notice::LoginFailed.redirect_to("/login").into_response()
        }
    }
}

/// Clears the session cookie.
///
/// # Endpoint
///
/// `POST /logout`
pub async fn logout_handler(State(state): State<AppState>) -> Response {
    (
        [(SET_COOKIE, expired_session_cookie(state.cookie_secure))],
        Notice::LoggedOut.redirect_to("/login"),
    )
        .into_response()
}

/// Explains how accounts are issued.
///
/// # Endpoint
///
/// `GET /signup`
pub async fn signup_handler() -> impl IntoResponse {
    SignupTemplate {}
}
