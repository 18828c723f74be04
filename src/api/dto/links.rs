//! DTOs for link creation and reporting endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CategoryCount, CreateLink, DailyClicks, LinkReport};

/// Request to create a short link.
///
/// URL and alias rules are enforced by the creation service; the limits
/// here only bound the payload.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub original_url: String,

    #[validate(length(max = 50, message = "Custom alias must be 3-50 characters"))]
    pub custom_alias: Option<String>,

    /// Last day (UTC) on which the link resolves.
    pub expiration_date: Option<NaiveDate>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        CreateLink {
            original_url: req.original_url,
            custom_alias: req.custom_alias,
            expiration_date: req.expiration_date,
        }
    }
}

/// Newly created link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub expiration_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Click count for one day.
#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    pub date: NaiveDate,
    pub clicks: u64,
}

impl From<DailyClicks> for DailyClicksItem {
    fn from(d: DailyClicks) -> Self {
        Self {
            date: d.date,
            clicks: d.clicks,
        }
    }
}

/// Count for one device class or browser.
#[derive(Debug, Serialize)]
pub struct BreakdownItem {
    pub label: String,
    pub count: u64,
}

impl From<CategoryCount> for BreakdownItem {
    fn from(c: CategoryCount) -> Self {
        Self {
            label: c.label.to_string(),
            count: c.count,
        }
    }
}

/// Analytics report for a single link.
#[derive(Debug, Serialize)]
pub struct LinkReportResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiration_date: Option<NaiveDate>,
    pub clicks: i64,
    pub qr_payload: String,
    pub daily_clicks: Vec<DailyClicksItem>,
    pub devices: Vec<BreakdownItem>,
    pub browsers: Vec<BreakdownItem>,
}

impl From<LinkReport> for LinkReportResponse {
    fn from(report: LinkReport) -> Self {
        Self {
            short_code: report.link.short_code,
            short_url: report.short_url,
            original_url: report.link.original_url,
            created_at: report.link.created_at,
            expiration_date: report.link.expiration_date,
            clicks: report.link.clicks,
            qr_payload: report.qr_payload,
            daily_clicks: report.daily.into_iter().map(Into::into).collect(),
            devices: report.devices.into_iter().map(Into::into).collect(),
            browsers: report.browsers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Paginated list of link reports.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkReportResponse>,
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}
