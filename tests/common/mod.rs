#![allow(dead_code)]

use axum_test::TestServer;
use chrono::NaiveDate;
use linkstat::application::services::auth_service::hash_token;
use linkstat::domain::entities::{NewShortLink, ShortLink};
use linkstat::domain::repositories::{LinkRepository, TokenRepository};
use linkstat::infrastructure::persistence::{MemoryLinkRepository, MemoryTokenRepository};
use linkstat::routes::{RouterOptions, app_routes};
use linkstat::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "https://s.example.com";
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

/// In-memory application with two owners, `alice` and `bob`.
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
    pub tokens: Arc<MemoryTokenRepository>,
}

impl TestApp {
    pub async fn new() -> Self {
        let links = Arc::new(MemoryLinkRepository::new());
        let tokens = Arc::new(MemoryTokenRepository::new());

        for (name, owner, token) in [("alice", "alice", ALICE_TOKEN), ("bob", "bob", BOB_TOKEN)] {
            tokens
                .create_token(name, owner, &hash_token(SIGNING_SECRET, token))
                .await
                .unwrap();
        }

        let state = AppState::new(
            links.clone(),
            tokens.clone(),
            BASE_URL,
            SIGNING_SECRET.to_string(),
            false,
        );

        Self {
            state,
            links,
            tokens,
        }
    }

    /// Full router without rate limiting.
    pub fn server(&self) -> TestServer {
        let app = app_routes(
            self.state.clone(),
            RouterOptions {
                rate_limit: false,
                behind_proxy: false,
            },
        );
        TestServer::new(app).unwrap()
    }

    pub async fn create_link(
        &self,
        code: &str,
        url: &str,
        owner: &str,
        expiration_date: Option<NaiveDate>,
    ) -> ShortLink {
        self.links
            .insert(NewShortLink {
                short_code: code.to_string(),
                original_url: url.to_string(),
                owner_id: owner.to_string(),
                expiration_date,
            })
            .await
            .unwrap()
    }

    pub async fn link(&self, code: &str) -> ShortLink {
        self.links.find_by_code(code).await.unwrap().unwrap()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn session(token: &str) -> String {
    format!("auth_token={token}")
}
