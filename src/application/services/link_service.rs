//! Short link creation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{CurrentUser, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_short_code, validate_alias};
use crate::utils::destination::{DestinationError, validate_destination};

/// Attempts at inserting a generated code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Input of the creation flow.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

/// Service for creating short links on behalf of an owner.
///
/// Uniqueness of short codes is enforced by the store's conditional insert;
/// the alias lookup before it only gives an early, friendly error.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built from.
    pub fn new(repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into(),
        }
    }

    /// Creates a short link owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - the URL is empty or not an absolute http(s) URL
    /// - the expiration date is in the past
    /// - the custom alias is malformed or reserved
    ///
    /// Returns [`AppError::Conflict`] if the custom alias is already in use.
    ///
    /// Returns [`AppError::Internal`] if the store fails.
    pub async fn create_link(
        &self,
        owner: &CurrentUser,
        input: CreateLink,
    ) -> Result<ShortLink, AppError> {
        let original_url = input.original_url.trim().to_string();

        validate_destination(&original_url).map_err(|e| match e {
            DestinationError::Empty => AppError::bad_request("Please enter a URL", json!({})),
            other => AppError::bad_request(
                "Please enter a valid URL",
                json!({ "reason": other.to_string() }),
            ),
        })?;

        if let Some(date) = input.expiration_date
            && date < Utc::now().date_naive()
        {
            return Err(AppError::bad_request(
                "Expiration date cannot be in the past",
                json!({ "expiration_date": date }),
            ));
        }

        let alias = input
            .custom_alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let link = match alias {
            Some(alias) => {
                self.create_with_alias(owner, original_url, alias, input.expiration_date)
                    .await?
            }
            None => {
                self.create_with_generated_code(owner, original_url, input.expiration_date)
                    .await?
            }
        };

        info!(
            short_code = %link.short_code,
            owner = %link.owner_id,
            "Short link created"
        );

        Ok(link)
    }

    /// Builds the public short URL for a link.
    pub fn short_url(&self, link: &ShortLink) -> String {
        link.short_url(&self.base_url)
    }

    async fn create_with_alias(
        &self,
        owner: &CurrentUser,
        original_url: String,
        alias: &str,
        expiration_date: Option<NaiveDate>,
    ) -> Result<ShortLink, AppError> {
        validate_alias(alias)?;

        if self
            .repository
            .find_by_code(alias)
            .await
            .map_err(creation_failure)?
            .is_some()
        {
            return Err(alias_in_use(alias));
        }

        let new_link = NewShortLink {
            short_code: generate_short_code(Some(alias)),
            original_url,
            owner_id: owner.owner_id.clone(),
            expiration_date,
        };

        // A concurrent creation may have claimed the alias since the lookup.
        self.repository
            .insert(new_link)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => alias_in_use(alias),
                other => creation_failure(other),
            })
    }

    async fn create_with_generated_code(
        &self,
        owner: &CurrentUser,
        original_url: String,
        expiration_date: Option<NaiveDate>,
    ) -> Result<ShortLink, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let new_link = NewShortLink {
                short_code: generate_short_code(None),
                original_url: original_url.clone(),
                owner_id: owner.owner_id.clone(),
                expiration_date,
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    warn!("Generated short code collided, retrying");
                }
                Err(e) => return Err(creation_failure(e)),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

fn alias_in_use(alias: &str) -> AppError {
    AppError::conflict(
        "Custom alias is already in use",
        json!({ "alias": alias }),
    )
}

/// Collapses store failures into the generic creation notice.
fn creation_failure(e: AppError) -> AppError {
    match e {
        AppError::Internal { .. } => {
            AppError::internal("Failed to create short URL", json!({}))
        }
        other => other,
    }
}
