//! Handlers for link reports.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::links::{LinkListResponse, LinkReportResponse, PaginationMeta};
use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the authenticated user's links with their analytics, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 100)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn link_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (reports, total_items) = tokio::try_join!(
        state.report_service.reports_for_owner(&user, offset, limit),
        state.report_service.count_for_owner(&user)
    )?;

    Ok(Json(LinkListResponse {
        pagination: PaginationMeta {
            page: params.page(),
            page_size: params.page_size(),
            total_items,
            total_pages: params.total_pages(total_items),
        },
        items: reports.into_iter().map(Into::into).collect(),
    }))
}

/// Returns the analytics report for one of the user's links.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist or belongs to someone else.
pub async fn link_report_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(code): Path<String>,
) -> Result<Json<LinkReportResponse>, AppError> {
    let report = state.report_service.report_for_code(&user, &code).await?;

    Ok(Json(report.into()))
}
