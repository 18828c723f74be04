//! Redirect resolution and click recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::client_profile::ClientProfile;
use crate::domain::entities::ClickSample;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::destination::redirect_location;

/// Result of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The visit was recorded; send the browser to `location`, the stored
    /// destination as a header-safe string.
    Forward { location: String },
    /// No link has this code.
    NotFound,
    /// The link exists but its expiration date has passed. Nothing was recorded.
    Expired,
}

/// Resolves short codes and records one click per successful resolution.
pub struct RedirectService {
    repository: Arc<dyn LinkRepository>,
}

impl RedirectService {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Resolves `code` as visited at `now` by a client with `user_agent`.
    ///
    /// For an active link the click is recorded atomically before
    /// returning [`RedirectOutcome::Forward`]: the timestamp is appended,
    /// exactly one device and one browser counter is incremented, and
    /// `clicks` is incremented.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors, and without
    /// recording anything when the stored destination cannot be sent as a
    /// `Location` header.
    pub async fn resolve(
        &self,
        code: &str,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RedirectOutcome, AppError> {
        let Some(link) = self.repository.find_by_code(code).await? else {
            debug!(code, "Short code not found");
            return Ok(RedirectOutcome::NotFound);
        };

        if link.is_expired_at(now) {
            debug!(code, "Short code expired");
            return Ok(RedirectOutcome::Expired);
        }

        let Some(location) = redirect_location(&link.original_url) else {
            return Err(AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "code": code }),
            ));
        };

        let profile = ClientProfile::from_user_agent(user_agent);
        let sample = ClickSample {
            at: now,
            device: profile.device,
            browser: profile.browser,
        };

        match self.repository.record_click(link.id, &sample).await? {
            Some(_) => Ok(RedirectOutcome::Forward { location }),
            None => {
                warn!(code, id = link.id, "Link vanished while recording click");
                Ok(RedirectOutcome::NotFound)
            }
        }
    }
}
