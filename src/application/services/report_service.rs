//! Per-owner link reports for the dashboard and the JSON API.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::entities::{CurrentUser, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Clicks on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: u64,
}

/// One slice of a categorical breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: &'static str,
    pub count: u64,
}

/// Everything the dashboard shows for one link.
///
/// Derived from the stored record only; building a report never mutates it.
#[derive(Debug, Clone)]
pub struct LinkReport {
    pub link: ShortLink,
    pub short_url: String,
    /// Payload encoded into the QR image. Same string visitors use.
    pub qr_payload: String,
    /// Clicks grouped by day, ascending.
    pub daily: Vec<DailyClicks>,
    pub devices: Vec<CategoryCount>,
    pub browsers: Vec<CategoryCount>,
}

impl LinkReport {
    pub fn from_link(link: ShortLink, base_url: &str) -> Self {
        let short_url = link.short_url(base_url);

        let daily = link
            .analytics
            .daily_clicks()
            .into_iter()
            .map(|(date, clicks)| DailyClicks { date, clicks })
            .collect();

        let devices = link
            .analytics
            .devices
            .iter()
            .map(|(device, count)| CategoryCount {
                label: device.as_str(),
                count: *count,
            })
            .collect();

        let browsers = link
            .analytics
            .browsers
            .iter()
            .map(|(browser, count)| CategoryCount {
                label: browser.as_str(),
                count: *count,
            })
            .collect();

        Self {
            qr_payload: short_url.clone(),
            short_url,
            link,
            daily,
            devices,
            browsers,
        }
    }
}

/// Read-only reporting over an owner's links.
pub struct ReportService {
    repository: Arc<dyn LinkRepository>,
    base_url: String,
}

impl ReportService {
    pub fn new(repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into(),
        }
    }

    /// Reports for a page of the owner's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn reports_for_owner(
        &self,
        owner: &CurrentUser,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LinkReport>, AppError> {
        let links = self
            .repository
            .list_by_owner(&owner.owner_id, offset, limit)
            .await?;

        Ok(links
            .into_iter()
            .map(|link| LinkReport::from_link(link, &self.base_url))
            .collect())
    }

    /// Total number of links the owner has created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn count_for_owner(&self, owner: &CurrentUser) -> Result<i64, AppError> {
        self.repository.count_by_owner(&owner.owner_id).await
    }

    /// Report for a single code owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist or belongs
    /// to a different owner.
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn report_for_code(
        &self,
        owner: &CurrentUser,
        code: &str,
    ) -> Result<LinkReport, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .filter(|link| link.owner_id == owner.owner_id)
            .map(|link| LinkReport::from_link(link, &self.base_url))
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Analytics, BrowserName, ClickSample, DeviceClass};
    use crate::domain::repositories::MockLinkRepository;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn link(code: &str, owner: &str) -> ShortLink {
        let mut analytics = Analytics::default();
        for (ts, device, browser) in [
            (at(3, 9), DeviceClass::Desktop, BrowserName::Firefox),
            (at(1, 23), DeviceClass::Mobile, BrowserName::Safari),
            (at(3, 1), DeviceClass::Mobile, BrowserName::Chrome),
        ] {
            analytics.record(&ClickSample {
                at: ts,
                device,
                browser,
            });
        }

        ShortLink {
            id: 1,
            short_code: code.to_string(),
            original_url: "https://example.com".to_string(),
            owner_id: owner.to_string(),
            created_at: at(1, 0),
            expiration_date: None,
            clicks: 3,
            analytics,
        }
    }

    #[test]
    fn test_report_derivation() {
        let report = LinkReport::from_link(link("promo", "alice"), "https://s.example.com/");

        assert_eq!(report.short_url, "https://s.example.com/promo");
        assert_eq!(report.qr_payload, report.short_url);
        assert_eq!(
            report.daily,
            vec![
                DailyClicks {
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    clicks: 1
                },
                DailyClicks {
                    date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                    clicks: 2
                },
            ]
        );
        assert_eq!(
            report.devices,
            vec![
                CategoryCount {
                    label: "Mobile",
                    count: 2
                },
                CategoryCount {
                    label: "Desktop",
                    count: 1
                },
            ]
        );
        assert_eq!(report.browsers.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[tokio::test]
    async fn test_reports_for_owner_passes_paging() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner()
            .withf(|owner, offset, limit| owner == "alice" && *offset == 25 && *limit == 25)
            .times(1)
            .returning(|_, _, _| Ok(vec![link("a1", "alice"), link("a2", "alice")]));

        let service = ReportService::new(Arc::new(repo), "https://s.example.com");
        let reports = service
            .reports_for_owner(&CurrentUser::new("alice"), 25, 25)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].short_url, "https://s.example.com/a2");
    }

    #[tokio::test]
    async fn test_report_for_foreign_code_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(link(code, "bob"))));

        let service = ReportService::new(Arc::new(repo), "https://s.example.com");
        let result = service
            .report_for_code(&CurrentUser::new("alice"), "promo")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_report_for_own_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "alice"))));

        let service = ReportService::new(Arc::new(repo), "https://s.example.com");
        let report = service
            .report_for_code(&CurrentUser::new("alice"), "promo")
            .await
            .unwrap();

        assert_eq!(report.link.clicks, 3);
    }
}
