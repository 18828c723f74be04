//! In-process link store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Analytics, ClickSample, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store backed by concurrent hash maps.
///
/// Keyed by short code, so the entry API gives an atomic "insert if absent".
/// `record_click` mutates the entry under its shard write lock.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    codes_by_id: DashMap<i64, String>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short code already exists",
                json!({ "short_code": new_link.short_code }),
            )),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                let link = ShortLink {
                    id,
                    short_code: new_link.short_code,
                    original_url: new_link.original_url,
                    owner_id: new_link.owner_id,
                    created_at: Utc::now(),
                    expiration_date: new_link.expiration_date,
                    clicks: 0,
                    analytics: Analytics::default(),
                };
                self.codes_by_id.insert(id, link.short_code.clone());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortLink>, AppError> {
        let mut owned: Vec<ShortLink> = self
            .links
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(owned
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count = self
            .links
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .count();

        Ok(count as i64)
    }

    async fn record_click(
        &self,
        id: i64,
        sample: &ClickSample,
    ) -> Result<Option<ShortLink>, AppError> {
        let Some(code) = self.codes_by_id.get(&id).map(|c| c.value().clone()) else {
            return Ok(None);
        };

        Ok(self.links.get_mut(&code).map(|mut entry| {
            let link = entry.value_mut();
            link.clicks += 1;
            link.analytics.record(sample);
            link.clone()
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
