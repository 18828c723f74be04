//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, migrations, and the Axum
//! server lifecycle.

use crate::application::services::auth_service::hash_token;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::infrastructure::persistence::{
    MemoryLinkRepository, MemoryTokenRepository, PgLinkRepository, PgTokenRepository,
};
use crate::routes::{RouterOptions, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

type Repositories = (Arc<dyn LinkRepository>, Arc<dyn TokenRepository>);

/// Connects to PostgreSQL and applies pending migrations.
async fn postgres_repositories(config: &Config, database_url: &str) -> Result<Repositories> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    Ok((
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgTokenRepository::new(pool)),
    ))
}

/// Builds the in-process store, registering `DEV_TOKEN` when set.
async fn memory_repositories(config: &Config) -> Result<Repositories> {
    let tokens = MemoryTokenRepository::new();

    match &config.dev_token {
        Some(token) => {
            let token_hash = hash_token(&config.token_signing_secret, token);
            tokens
                .create_token("dev", &config.dev_owner, &token_hash)
                .await
                .context("Failed to register DEV_TOKEN")?;
            tracing::info!(owner = %config.dev_owner, "Registered development token");
        }
        None => tracing::warn!("Memory storage without DEV_TOKEN: no token can sign in"),
    }

    Ok((Arc::new(MemoryLinkRepository::new()), Arc::new(tokens)))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and token storage (PostgreSQL with migrations, or in-memory)
/// - Application services
/// - Axum HTTP server with per-IP rate limiting
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (link_repository, token_repository) = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            postgres_repositories(&config, database_url).await?
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage; data is lost on restart");
            memory_repositories(&config).await?
        }
    };

    let state = AppState::new(
        link_repository,
        token_repository,
        &config.public_base_url,
        config.token_signing_secret.clone(),
        config.cookie_secure,
    );

    let app = app_router(
        state,
        RouterOptions {
            rate_limit: true,
            behind_proxy: config.behind_proxy,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
