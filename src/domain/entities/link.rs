//! Short link entity.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::analytics::Analytics;

/// A stored short link with its embedded analytics.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expiration_date: Option<NaiveDate>,
    pub clicks: i64,
    pub analytics: Analytics,
}

impl ShortLink {
    /// Returns true once `now` is past the start (00:00 UTC) of the
    /// expiration date.
    ///
    /// A link dated D resolves until D 00:00:00 UTC and is expired from
    /// the first instant after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date
            .is_some_and(|date| date.and_time(NaiveTime::MIN).and_utc() < now)
    }

    /// Builds the public short URL for this link.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

/// Input data for inserting a new link.
///
/// New links always start with zero clicks and empty analytics.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,
    pub expiration_date: Option<NaiveDate>,
}
