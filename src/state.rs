//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RedirectService, ReportService};
use crate::domain::repositories::{LinkRepository, TokenRepository};

/// Services and settings shared across requests.
///
/// Cheap to clone; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub report_service: Arc<ReportService>,
    pub auth_service: Arc<AuthService>,
    /// Store handle used by the health check.
    pub link_repository: Arc<dyn LinkRepository>,
    /// Public origin short URLs are built from, without trailing slash.
    pub base_url: String,
    /// Whether the dashboard session cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    /// Wires every service onto the given repositories.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        token_repository: Arc<dyn TokenRepository>,
        base_url: &str,
        token_signing_secret: String,
        cookie_secure: bool,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone(), &base_url)),
            redirect_service: Arc::new(RedirectService::new(link_repository.clone())),
            report_service: Arc::new(ReportService::new(link_repository.clone(), &base_url)),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
            link_repository,
            base_url,
            cookie_secure,
        }
    }
}
