//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters for a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// Home page, login, redirects: burst of 100, one token back every 2s.
    Public,
    /// Authenticated API and dashboard: burst of 10, one token back every second.
    Secure,
}

impl RateLimit {
    /// Seconds between replenished tokens.
    fn per_second(self) -> u64 {
        match self {
            RateLimit::Public => 2,
            RateLimit::Secure => 1,
        }
    }

    fn burst_size(self) -> u32 {
        match self {
            RateLimit::Public => 100,
            RateLimit::Secure => 10,
        }
    }
}

fn governor_config<K: KeyExtractor>(
    key_extractor: K,
    limit: RateLimit,
) -> Arc<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(limit.per_second())
            .burst_size(limit.burst_size())
            .finish()
            .expect("rate limit periods and bursts are non-zero"),
    )
}

/// Applies a per-client-IP rate limiter to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy` the client IP is read from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the peer address. Otherwise
/// only the socket peer address is used, which requires the server to be
/// started with connect info.
///
/// # Example
///
/// ```rust,ignore
/// let public = rate_limit::apply(web::routes::public_routes(), RateLimit::Public, false);
/// ```
pub fn apply(router: Router<AppState>, limit: RateLimit, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        let layer: GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> =
            GovernorLayer::new(governor_config(SmartIpKeyExtractor, limit));
        router.layer(layer)
    } else {
        let layer: GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> =
            GovernorLayer::new(governor_config(PeerIpKeyExtractor, limit));
        router.layer(layer)
    }
}
