//! In-process token store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// Token store keyed by token hash.
#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: DashMap<String, ApiToken>,
    next_id: AtomicI64,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .get(token_hash)
            .filter(|t| t.revoked_at.is_none())
            .map(|t| t.value().clone()))
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        if self.tokens.iter().any(|t| t.name == name) {
            return Err(AppError::conflict(
                "Token name already exists",
                json!({ "name": name }),
            ));
        }

        match self.tokens.entry(token_hash.to_string()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            )),
            Entry::Vacant(slot) => {
                let token = ApiToken {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    name: name.to_string(),
                    owner_id: owner_id.to_string(),
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    revoked_at: None,
                };
                slot.insert(token.clone());
                Ok(token)
            }
        }
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value().clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        for mut token in self.tokens.iter_mut() {
            if token.id == id && token.revoked_at.is_none() {
                token.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryTokenRepository::new();

        let token = repo.create_token("ci", "alice", "hash-1").await.unwrap();

        let found = repo.find_active("hash-1").await.unwrap().unwrap();
        assert_eq!(found.id, token.id);
        assert_eq!(found.owner_id, "alice");
        assert!(repo.find_active("hash-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repo = MemoryTokenRepository::new();

        repo.create_token("ci", "alice", "hash-1").await.unwrap();
        let err = repo.create_token("ci", "bob", "hash-2").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_revoked_token_inactive() {
        let repo = MemoryTokenRepository::new();
        let token = repo.create_token("ci", "alice", "hash-1").await.unwrap();

        repo.revoke_token(token.id).await.unwrap();

        assert!(repo.find_active("hash-1").await.unwrap().is_none());
        assert!(
            repo.find_by_name("ci")
                .await
                .unwrap()
                .unwrap()
                .revoked_at
                .is_some()
        );
    }
}
