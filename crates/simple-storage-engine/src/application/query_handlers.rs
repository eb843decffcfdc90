//! Query handlers for the storage engine.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs. Views are copies;
//! nothing returned here aliases engine state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use simple_storage_core::error::DomainError;
use simple_storage_core::identity::AccountId;
use simple_storage_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::SimpleStorage;
use crate::domain::directory::PersonEntry;
use crate::domain::events::StorageEventKind;

/// Read-only view of a storage engine aggregate.
#[derive(Debug, Serialize)]
pub struct StorageView {
    /// The storage engine identifier.
    pub storage_id: Uuid,
    /// The owner fixed at deployment.
    pub owner: AccountId,
    /// The current favorite number.
    pub favorite_number: u64,
    /// Number of distinct names in the directory.
    pub distinct_people: usize,
    /// Number of `add_person` calls recorded.
    pub person_entries: usize,
    /// Current version (event count).
    pub version: i64,
}

/// Read-only view of one event in a storage engine's log.
#[derive(Debug, Serialize)]
pub struct StorageEventView {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Event type identifier.
    pub event_type: String,
    /// Position in the stream, starting at 1.
    pub sequence_number: i64,
    /// Identity whose call produced the event.
    pub initiated_by: AccountId,
    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,
    /// The decoded payload.
    pub payload: StorageEventKind,
}

fn owner_of(storage: &SimpleStorage) -> Result<AccountId, DomainError> {
    storage.owner().ok_or_else(|| {
        DomainError::Infrastructure(format!("storage {} has no owner", storage.id))
    })
}

/// Retrieves a storage engine by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_storage_by_id(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<StorageView, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    Ok(StorageView {
        storage_id,
        owner: owner_of(&storage)?,
        favorite_number: storage.retrieve(),
        distinct_people: storage.distinct_people(),
        person_entries: storage.people().len(),
        version: storage.version,
    })
}

/// Returns the current favorite number (0 before any store).
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn retrieve(storage_id: Uuid, repo: &dyn EventRepository) -> Result<u64, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    Ok(storage.retrieve())
}

/// Reads the engine's public `favorite_number` getter.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn favorite_number(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<u64, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    Ok(storage.favorite_number())
}

/// Returns the owner of a storage engine.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn get_owner(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<AccountId, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    owner_of(&storage)
}

/// Returns the favorite number recorded for `name`, or 0 if never added.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn lookup_favorite_number(
    storage_id: Uuid,
    name: &str,
    repo: &dyn EventRepository,
) -> Result<u64, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    Ok(storage.lookup(name))
}

/// Lists every `add_person` call in insertion order.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn list_people(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<PersonEntry>, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    Ok(storage.people().to_vec())
}

/// Returns the `index`-th person entry in insertion order.
///
/// # Errors
///
/// Returns `DomainError::InvalidInput` if `index` is past the end, or
/// `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn get_person_at(
    storage_id: Uuid,
    index: usize,
    repo: &dyn EventRepository,
) -> Result<PersonEntry, DomainError> {
    let storage = command_handlers::load(storage_id, repo).await?;
    storage.person_at(index).cloned().ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "person index {index} out of range for {} entries",
            storage.people().len()
        ))
    })
}

/// Lists the events recorded for a storage engine, oldest first.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn list_events(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<StorageEventView>, DomainError> {
    let stored_events = repo.load_events(storage_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(storage_id));
    }
    stored_events
        .iter()
        .map(|stored| {
            let event = command_handlers::to_domain_event(stored)?;
            Ok(StorageEventView {
                event_id: event.metadata.event_id,
                event_type: event.metadata.event_type,
                sequence_number: event.metadata.sequence_number,
                initiated_by: event.metadata.initiated_by,
                occurred_at: event.metadata.occurred_at,
                payload: event.kind,
            })
        })
        .collect()
}
