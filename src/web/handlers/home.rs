//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, http::HeaderMap, response::IntoResponse};
use serde::Deserialize;

use crate::web::middleware::web_auth::token_from_cookies;
use crate::web::notice::Flash;

/// Query parameters accepted by pages that render notices.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
struct HomeTemplate {
    flash: Option<Flash>,
    signed_in: bool,
}

/// Renders the home page.
///
/// # Endpoint
///
/// `GET /`
///
/// Redirect failures land here with `?notice=not_found|expired|error`.
pub async fn home_handler(
    Query(query): Query<NoticeQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    HomeTemplate {
        flash: Flash::from_query(query.notice.as_deref()),
        signed_in: token_from_cookies(&headers).is_some(),
    }
}
