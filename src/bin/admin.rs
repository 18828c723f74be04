//! Operator CLI for linkstat.
//!
//! Issues and revokes API tokens, prints link totals and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Issue a token for an owner
//! cargo run --bin admin -- token create --name laptop --owner alice
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token by name or id
//! cargo run --bin admin -- token revoke laptop
//!
//! # Link and click totals, busiest links first
//! cargo run --bin admin -- stats --top 5
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or the `DB_*` components: PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET`: must match the server's, or issued tokens will not authenticate

use linkstat::application::services::auth_service::hash_token;
use linkstat::config::Config;
use linkstat::domain::repositories::TokenRepository;
use linkstat::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link and click totals
    Stats {
        /// Number of most-clicked links to list
        #[arg(long, default_value_t = 10)]
        top: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new API token
    Create {
        /// Token label, unique across tokens (e.g. "laptop", "ci")
        #[arg(short, long)]
        name: Option<String>,

        /// Owner the token acts for; links created with it belong to this owner
        #[arg(short, long)]
        owner: Option<String>,

        /// Use this value instead of generating one
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or id
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats { top } => handle_stats(&pool, top).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create {
            name,
            owner,
            token,
            yes,
        } => {
            let secret = std::env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set")?;
            create_token(&repo, &secret, name, owner, token, yes).await?;
        }
        TokenAction::List => list_tokens(&repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, &name_or_id).await?,
    }

    Ok(())
}

/// Issues a token for an owner.
///
/// Only the HMAC of the token is stored. The raw value is printed once.
async fn create_token(
    repo: &PgTokenRepository,
    secret: &str,
    name: Option<String>,
    owner: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Issue API token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Token name").interact_text()?,
    };

    let owner_id = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner").interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!("  Name:  {}", token_name.cyan());
    println!("  Owner: {}", owner_id.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "Save this token now. It cannot be shown again.".red().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    repo.create_token(&token_name, &owner_id, &hash_token(secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "Token created.".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!("  or sign in at {} with the same value", "/login".bright_cyan());
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "No tokens found".yellow());
        println!(
            "Issue one with: {} admin -- token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<24} {:<16} {:<17} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<4} {:<24} {:<16} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.owner_id,
            token.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by id (numeric input) or exact name.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: &str) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {} ({})", token.name.cyan(), token.owner_id);

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

async fn handle_stats(pool: &PgPool, top: i64) -> Result<()> {
    let (links, clicks): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(clicks), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT owner_id) FROM links")
        .fetch_one(pool)
        .await?;

    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("{}", "Statistics".bright_blue().bold());
    println!("  Links:         {}", links.to_string().bright_green().bold());
    println!("  Clicks:        {}", clicks.to_string().bright_green().bold());
    println!("  Owners:        {}", owners.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens.to_string().bright_green().bold());

    let busiest: Vec<(String, String, i64)> = sqlx::query_as(
        "SELECT short_code, owner_id, clicks FROM links ORDER BY clicks DESC, id ASC LIMIT $1",
    )
    .bind(top.max(0))
    .fetch_all(pool)
    .await?;

    if !busiest.is_empty() {
        println!();
        println!("{}", "Most clicked".bright_white().bold());
        for (code, owner, clicks) in busiest {
            println!("  {:<20} {:<16} {}", code.cyan(), owner, clicks);
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
