//! Dashboard page: creation form and per-link analytics.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_with::{DisplayFromStr, NoneAsEmptyString, serde_as};
use tracing::warn;

use crate::api::dto::pagination::PaginationParams;
use crate::application::services::{CategoryCount, CreateLink, LinkReport};
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::notice::{Flash, Notice};

/// One bar of a chart.
pub struct BarView {
    pub label: String,
    pub count: u64,
    /// Bar width, 0-100.
    pub percent: u64,
}

/// One row of the links table.
pub struct LinkView {
    pub short_code: String,
    pub short_url: String,
    pub qr_payload: String,
    pub original_url: String,
    pub clicks: i64,
    pub created: String,
    pub expires: String,
    pub expired: bool,
    pub daily: Vec<BarView>,
    pub devices: Vec<BarView>,
    pub browsers: Vec<BarView>,
}

/// The link just created through the form, shown above the table with a
/// copy button.
pub struct CreatedView {
    pub short_url: String,
    pub original_url: String,
}

/// Values echoed back into the creation form after a failed submission.
#[derive(Default)]
pub struct FormValues {
    pub original_url: String,
    pub custom_alias: String,
    pub expiration_date: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    owner: String,
    flash: Option<Flash>,
    created: Option<CreatedView>,
    form: FormValues,
    min_date: String,
    links: Vec<LinkView>,
    total_links: i64,
    page: u32,
    total_pages: u32,
}

impl DashboardTemplate {
    fn has_prev(&self) -> bool {
        self.page > 1
    }

    fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Query parameters of `GET /dashboard`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,
    pub notice: Option<String>,
    /// Short code of the link just created, set together with
    /// `notice=created`.
    pub code: Option<String>,
}

/// Submitted creation form. Empty inputs arrive as empty strings.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    pub original_url: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

fn bars(items: Vec<CategoryCount>, total: u64) -> Vec<BarView> {
    items
        .into_iter()
        .map(|item| BarView {
            label: item.label.to_string(),
            count: item.count,
            percent: percent(item.count, total),
        })
        .collect()
}

fn percent(count: u64, of: u64) -> u64 {
    if of == 0 { 0 } else { count * 100 / of }
}

impl LinkView {
    fn from_report(report: LinkReport, now: DateTime<Utc>) -> Self {
        let peak = report.daily.iter().map(|d| d.clicks).max().unwrap_or(0);
        let device_total = report.devices.iter().map(|d| d.count).sum();
        let browser_total = report.browsers.iter().map(|b| b.count).sum();

        let daily = report
            .daily
            .into_iter()
            .map(|d| BarView {
                label: d.date.format("%Y-%m-%d").to_string(),
                count: d.clicks,
                percent: percent(d.clicks, peak),
            })
            .collect();

        let link = report.link;

        Self {
            short_url: report.short_url,
            qr_payload: report.qr_payload,
            created: link.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            expires: link
                .expiration_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Never".to_string()),
            expired: link.is_expired_at(now),
            short_code: link.short_code,
            original_url: link.original_url,
            clicks: link.clicks,
            daily,
            devices: bars(report.devices, device_total),
            browsers: bars(report.browsers, browser_total),
        }
    }
}

async fn render(
    state: &AppState,
    user: &CurrentUser,
    page: u32,
    flash: Option<Flash>,
    created: Option<CreatedView>,
    form: FormValues,
) -> Result<DashboardTemplate, AppError> {
    let params = PaginationParams {
        page: Some(page.max(1)),
        page_size: None,
    };
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, serde_json::json!({})))?;

    let (reports, total_links) = tokio::try_join!(
        state.report_service.reports_for_owner(user, offset, limit),
        state.report_service.count_for_owner(user)
    )?;

    let now = Utc::now();

    Ok(DashboardTemplate {
        owner: user.owner_id.clone(),
        flash,
        created,
        form,
        min_date: now.date_naive().format("%Y-%m-%d").to_string(),
        links: reports
            .into_iter()
            .map(|report| LinkView::from_report(report, now))
            .collect(),
        total_links,
        page: params.page(),
        total_pages: params.total_pages(total_links),
    })
}

/// Renders the dashboard.
///
/// # Endpoint
///
/// `GET /dashboard?page=N`
///
/// Shows the creation form and, for each of the user's links, the short URL
/// with its QR code, click count, expiration, a daily click trend and the
/// device and browser breakdowns.
///
/// With `notice=created&code=C` the new short URL for `C` is shown above
/// the table. Codes that are unknown or owned by someone else are ignored.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate, AppError> {
    let flash = Flash::from_query(query.notice.as_deref());

    let notice = query.notice.as_deref().and_then(Notice::from_code);

    let created = match (notice, query.code) {
        (Some(Notice::Created), Some(code)) => {
            match state.report_service.report_for_code(&user, &code).await {
                Ok(report) => Some(CreatedView {
                    short_url: report.short_url,
                    original_url: report.link.original_url,
                }),
                Err(AppError::NotFound { .. }) => None,
                Err(e) => return Err(e),
            }
        }
        _ => None,
    };

    render(
        &state,
        &user,
        query.page.unwrap_or(1),
        flash,
        created,
        FormValues::default(),
    )
    .await
}

/// Handles the creation form.
///
/// # Endpoint
///
/// `POST /dashboard/links`
///
/// On success redirects to `/dashboard?notice=created&code=<short code>`.
/// On failure the dashboard is rendered again with the error and the
/// submitted values.
pub async fn create_link_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<CreateLinkForm>,
) -> Result<Response, AppError> {
    let values = FormValues {
        original_url: form.original_url.clone(),
        custom_alias: form.custom_alias.clone().unwrap_or_default(),
        expiration_date: form
            .expiration_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    };

    let input = CreateLink {
        original_url: form.original_url,
        custom_alias: form.custom_alias,
        expiration_date: form.expiration_date,
    };

    match state.link_service.create_link(&user, input).await {
        Ok(link) => Ok(Redirect::to(&format!(
            "/dashboard?notice={}&code={}",
            Notice::Created.code(),
            link.short_code
        ))
        .into_response()),
        Err(e) => {
            let status = match &e {
                AppError::Validation { .. } => StatusCode::BAD_REQUEST,
                AppError::Conflict { .. } => StatusCode::CONFLICT,
                _ => {
                    warn!(error = %e, "Dashboard link creation failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let page = render(
                &state,
                &user,
                1,
                Some(Flash::error(e.to_string())),
                None,
                values,
            )
            .await?;
            Ok((status, page).into_response())
        }
    }
}
