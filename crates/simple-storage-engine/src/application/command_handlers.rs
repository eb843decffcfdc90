//! Command handlers for the storage engine.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.
//! Callers that need writes totally ordered across requests hold a single
//! write lock around these calls (see the API crate's `AppState`).

use simple_storage_core::aggregate::AggregateRoot;
use simple_storage_core::clock::Clock;
use simple_storage_core::command::Command;
use simple_storage_core::error::DomainError;
use simple_storage_core::event::{DomainEvent, EventMetadata};
use simple_storage_core::repository::{EventRepository, StoredEvent};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::aggregates::SimpleStorage;
use crate::domain::commands::{AddPerson, DeployStorage, StoreNumber};
use crate::domain::events::{StorageEvent, StorageEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct StorageCommandResult {
    /// The aggregate ID affected or created by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

fn to_stored_event(event: &StorageEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        initiated_by: meta.initiated_by,
        occurred_at: meta.occurred_at,
    }
}

/// Decodes a stored event back into its domain envelope.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the payload does not deserialize.
pub(crate) fn to_domain_event(stored: &StoredEvent) -> Result<StorageEvent, DomainError> {
    let kind: StorageEventKind = serde_json::from_value(stored.payload.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))?;
    Ok(StorageEvent {
        metadata: EventMetadata {
            event_id: stored.event_id,
            event_type: stored.event_type.clone(),
            aggregate_id: stored.aggregate_id,
            sequence_number: stored.sequence_number,
            correlation_id: stored.correlation_id,
            causation_id: stored.causation_id,
            initiated_by: stored.initiated_by,
            occurred_at: stored.occurred_at,
        },
        kind,
    })
}

/// Reconstitutes a `SimpleStorage` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails or
/// the stream does not contain a deployment event.
pub(crate) fn reconstitute(
    storage_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<SimpleStorage, DomainError> {
    let mut storage = SimpleStorage::new(storage_id);
    for stored in existing_events {
        storage.apply(&to_domain_event(stored)?);
    }
    if storage.owner().is_none() {
        return Err(DomainError::Infrastructure(format!(
            "event stream for storage {storage_id} has no deployment event"
        )));
    }
    Ok(storage)
}

/// Loads and reconstitutes an existing storage engine.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID,
/// or any error from loading and reconstitution.
pub(crate) async fn load(
    storage_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<SimpleStorage, DomainError> {
    let existing_events = repo.load_events(storage_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(storage_id));
    }
    reconstitute(storage_id, &existing_events)
}

async fn persist(
    storage: &mut SimpleStorage,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = storage
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(storage.id, storage.version(), &stored_events)
        .await?;
    storage.clear_uncommitted_events();

    Ok(stored_events)
}

/// Handles the `DeployStorage` command: creates a new aggregate owned by the
/// deployer and persists the deployment event.
///
/// # Errors
///
/// Returns `DomainError` if event appending fails.
pub async fn handle_deploy_storage(
    command: &DeployStorage,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<StorageCommandResult, DomainError> {
    let storage_id = Uuid::new_v4();
    let mut storage =
        SimpleStorage::deploy(storage_id, command.caller(), command.correlation_id, clock);

    let stored_events = persist(&mut storage, repo).await?;

    info!(
        command = command.command_type(),
        %storage_id,
        owner = %command.caller(),
        "storage deployed"
    );

    Ok(StorageCommandResult {
        aggregate_id: storage_id,
        stored_events,
    })
}

/// Handles the `StoreNumber` command: loads the aggregate, checks the caller
/// against the owner, stores the number, and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` if the caller is not the owner, or
/// `DomainError` if event loading or appending fails.
pub async fn handle_store_number(
    command: &StoreNumber,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<StorageCommandResult, DomainError> {
    let mut storage = load(command.storage_id, repo).await?;

    storage
        .store(
            command.caller(),
            command.favorite_number,
            command.correlation_id,
            clock,
        )
        .inspect_err(|err| {
            warn!(
                command = command.command_type(),
                storage_id = %command.storage_id,
                caller = %command.caller(),
                error = %err,
                "store rejected"
            );
        })?;

    let stored_events = persist(&mut storage, repo).await?;

    info!(
        command = command.command_type(),
        storage_id = %command.storage_id,
        favorite_number = command.favorite_number,
        "number stored"
    );

    Ok(StorageCommandResult {
        aggregate_id: command.storage_id,
        stored_events,
    })
}

/// Handles the `AddPerson` command: loads the aggregate, upserts the person
/// entry, and persists the resulting event. Any caller is accepted.
///
/// # Errors
///
/// Returns `DomainError` if event loading or appending fails.
pub async fn handle_add_person(
    command: &AddPerson,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<StorageCommandResult, DomainError> {
    let mut storage = load(command.storage_id, repo).await?;

    storage.add_person(
        command.caller(),
        command.name.clone(),
        command.favorite_number,
        command.correlation_id,
        clock,
    );

    let stored_events = persist(&mut storage, repo).await?;

    info!(
        command = command.command_type(),
        storage_id = %command.storage_id,
        caller = %command.caller(),
        name = %command.name,
        favorite_number = command.favorite_number,
        "person added"
    );

    Ok(StorageCommandResult {
        aggregate_id: command.storage_id,
        stored_events,
    })
}
