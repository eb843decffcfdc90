//! Event store implementations for the SimpleStorage engine.
//!
//! Both implementations append each call's events atomically and reject
//! appends whose expected version is stale.

pub mod memory_event_repository;
pub mod pg_event_repository;

/// Migrations creating the `domain_events` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
