//! Authentication service resolving API tokens to owners.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::CurrentUser;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when issuing tokens.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating requests via Bearer tokens or the web cookie.
///
/// Tokens are hashed before storage and comparison. An attacker with
/// read-only access to the database cannot verify or forge tokens without
/// the server-side secret.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    pub fn hash_token(&self, token: &str) -> String {
        hash_token(&self.signing_secret, token)
    }

    /// Resolves a raw token to the user it belongs to.
    ///
    /// On success, updates the token's `last_used_at`; a failure there is
    /// logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = self.hash_token(token);

        let Some(api_token) = self.repository.find_active(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, token = %api_token.name, "Failed to update token last_used_at");
        }

        Ok(CurrentUser::new(api_token.owner_id))
    }
}
