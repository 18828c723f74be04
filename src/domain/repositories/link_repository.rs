//! Repository trait for short link data access.

use crate::domain::entities::{ClickSample, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `links` collection.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link if no link with the same short code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on store errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists links owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortLink>, AppError>;

    /// Counts links owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;

    /// Appends one visit to a link as a single atomic update.
    ///
    /// Increments `clicks`, appends the timestamp and bumps the device and
    /// browser counters. Concurrent calls never lose increments.
    ///
    /// Returns the updated link, or `None` if the id no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn record_click(
        &self,
        id: i64,
        sample: &ClickSample,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
