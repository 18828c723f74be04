//! Repository implementations.
//!
//! Concrete implementations of domain repository traits: PostgreSQL via SQLx
//! and an in-process store for development and tests.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage with atomic click recording
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`MemoryLinkRepository`] - In-process link storage
//! - [`MemoryTokenRepository`] - In-process token storage

pub mod memory_link_repository;
pub mod memory_token_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use memory_token_repository::MemoryTokenRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
