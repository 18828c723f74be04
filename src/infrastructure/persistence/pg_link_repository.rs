//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use crate::domain::entities::{Analytics, ClickSample, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, short_code, original_url, owner_id, created_at, expiration_date, clicks, analytics";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    owner_id: String,
    created_at: DateTime<Utc>,
    expiration_date: Option<NaiveDate>,
    clicks: i64,
    analytics: Json<Analytics>,
}

impl From<LinkRow> for ShortLink {
    fn from(row: LinkRow) -> Self {
        ShortLink {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            owner_id: row.owner_id,
            created_at: row.created_at,
            expiration_date: row.expiration_date,
            clicks: row.clicks,
            analytics: row.analytics.0,
        }
    }
}

/// PostgreSQL repository for the `links` table.
///
/// Analytics live in a JSONB column with the same shape as [`Analytics`].
/// Clicks are recorded with a single `UPDATE ... RETURNING` statement whose
/// expressions only read the target row, so concurrent visits serialize on
/// the row lock and no increment is lost.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (short_code, original_url, owner_id, expiration_date, clicks, analytics)
            VALUES ($1, $2, $3, $4, 0, $5)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.short_code)
            .bind(&new_link.original_url)
            .bind(&new_link.owner_id)
            .bind(new_link.expiration_date)
            .bind(Json(Analytics::default()))
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(ShortLink::from).ok_or_else(|| {
            AppError::conflict(
                "Short code already exists",
                json!({ "short_code": new_link.short_code }),
            )
        })
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn record_click(
        &self,
        id: i64,
        sample: &ClickSample,
    ) -> Result<Option<ShortLink>, AppError> {
        let sql = format!(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                analytics = jsonb_set(
                    jsonb_set(
                        jsonb_set(
                            analytics,
                            '{{timestamps}}',
                            COALESCE(analytics -> 'timestamps', '[]'::jsonb) || jsonb_build_array($2::text)
                        ),
                        ARRAY['devices', $3::text],
                        to_jsonb(COALESCE((analytics #>> ARRAY['devices', $3::text])::bigint, 0) + 1)
                    ),
                    ARRAY['browsers', $4::text],
                    to_jsonb(COALESCE((analytics #>> ARRAY['browsers', $4::text])::bigint, 0) + 1)
                )
            WHERE id = $1
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(sample.at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .bind(sample.device.as_str())
            .bind(sample.browser.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
