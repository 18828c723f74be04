//! Handler for link creation endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse};
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the authenticated user.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/a",
///   "custom_alias": "promo",          // optional
///   "expiration_date": "2030-01-31"   // optional, last active day (UTC)
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_code": "promo",
///   "short_url": "https://s.example.com/promo",
///   "original_url": "https://example.com/a",
///   "expiration_date": "2030-01-31",
///   "created_at": "2024-05-10T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is empty or invalid, the alias is malformed or reserved,
///   or the expiration date is in the past
/// - 409 if the alias is already in use
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&user, payload.into())
        .await?;

    let response = CreateLinkResponse {
        short_url: state.link_service.short_url(&link),
        short_code: link.short_code,
        original_url: link.original_url,
        expiration_date: link.expiration_date,
        created_at: link.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
