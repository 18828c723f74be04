//! Bearer token authentication for the JSON API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Resolves `Authorization: Bearer <token>` to the token's owner.
///
/// The resulting [`crate::domain::entities::CurrentUser`] is inserted into
/// the request extensions, where handlers pick it up with
/// `Extension<CurrentUser>`. Links created through the API belong to that
/// owner and reports are limited to it.
///
/// # Errors
///
/// `401 Unauthorized` with `WWW-Authenticate: Bearer` when the header is
/// missing or malformed, or the token is unknown or revoked.
///
/// ```rust,ignore
/// let api = api::routes::protected_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Missing bearer token",
                json!({ "reason": "Authorization header is missing or not a Bearer token" }),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    tracing::debug!(owner = %user.owner_id, path = %parts.uri.path(), "API request authenticated");

    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
