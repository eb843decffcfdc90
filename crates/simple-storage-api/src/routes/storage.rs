//! Routes for the SimpleStorage engine.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{info, instrument};
use uuid::Uuid;

use simple_storage_core::error::DomainError;
use simple_storage_core::identity::AccountId;
use simple_storage_engine::application::command_handlers::{self, StorageCommandResult};
use simple_storage_engine::application::query_handlers::{
    self, StorageEventView, StorageView,
};
use simple_storage_engine::domain::commands;
use simple_storage_engine::domain::directory::PersonEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct DeployStorageRequest {
    /// Account that deploys, and therefore owns, the new engine.
    pub deployer: AccountId,
}

/// Request body for POST /store.
#[derive(Debug, Deserialize)]
pub struct StoreNumberRequest {
    /// The storage engine to write to.
    pub storage_id: Uuid,
    /// The account issuing the call.
    pub caller: AccountId,
    /// Must fit in an unsigned 64-bit integer.
    pub favorite_number: Number,
}

/// Request body for POST /add-person.
#[derive(Debug, Deserialize)]
pub struct AddPersonRequest {
    /// The storage engine to write to.
    pub storage_id: Uuid,
    /// The account issuing the call.
    pub caller: AccountId,
    /// Person name; any string, including empty.
    pub name: String,
    /// Must fit in an unsigned 64-bit integer.
    pub favorite_number: Number,
}

/// Response body returned after a deployment.
#[derive(Debug, Serialize)]
pub struct DeployStorageResponse {
    /// ID of the newly deployed engine.
    pub aggregate_id: Uuid,
    /// The engine's owner.
    pub owner: AccountId,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body returned after a write command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The storage engine the command applied to.
    pub aggregate_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

impl From<StorageCommandResult> for CommandResponse {
    fn from(result: StorageCommandResult) -> Self {
        Self {
            aggregate_id: result.aggregate_id,
            event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
        }
    }
}

/// Query string for GET /{storage_id}/favorite-numbers.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Person name; `?name=` looks up the empty name.
    pub name: String,
}

/// Response body for GET /{storage_id}/retrieve.
#[derive(Debug, Serialize)]
pub struct FavoriteNumberResponse {
    /// The stored favorite number.
    pub favorite_number: u64,
}

/// Response body for GET /{storage_id}/owner.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    /// The engine's owner.
    pub owner: AccountId,
}

fn favorite_number_from(value: &Number) -> Result<u64, DomainError> {
    value.as_u64().ok_or_else(|| {
        DomainError::InvalidInput(format!(
            "favorite_number {value} is not an unsigned 64-bit integer"
        ))
    })
}

/// POST /
#[instrument(skip(state, request), fields(deployer = %request.deployer))]
async fn deploy_storage(
    State(state): State<AppState>,
    Json(request): Json<DeployStorageRequest>,
) -> Result<Json<DeployStorageResponse>, ApiError> {
    let command = commands::DeployStorage {
        correlation_id: Uuid::new_v4(),
        deployer: request.deployer,
    };

    info!(correlation_id = %command.correlation_id, "handling deploy_storage command");

    let _write = state.write_lock.lock().await;
    let result = command_handlers::handle_deploy_storage(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    let CommandResponse {
        aggregate_id,
        event_ids,
    } = CommandResponse::from(result);

    Ok(Json(DeployStorageResponse {
        aggregate_id,
        owner: command.deployer,
        event_ids,
    }))
}

/// POST /store
#[instrument(skip(state, request), fields(storage_id = %request.storage_id, caller = %request.caller))]
async fn store_number(
    State(state): State<AppState>,
    Json(request): Json<StoreNumberRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StoreNumber {
        correlation_id: Uuid::new_v4(),
        storage_id: request.storage_id,
        caller: request.caller,
        favorite_number: favorite_number_from(&request.favorite_number)?,
    };

    info!(correlation_id = %command.correlation_id, "handling store_number command");

    let _write = state.write_lock.lock().await;
    let result = command_handlers::handle_store_number(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse::from(result)))
}

/// POST /add-person
#[instrument(skip(state, request), fields(storage_id = %request.storage_id, caller = %request.caller))]
async fn add_person(
    State(state): State<AppState>,
    Json(request): Json<AddPersonRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddPerson {
        correlation_id: Uuid::new_v4(),
        storage_id: request.storage_id,
        caller: request.caller,
        favorite_number: favorite_number_from(&request.favorite_number)?,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling add_person command");

    let _write = state.write_lock.lock().await;
    let result = command_handlers::handle_add_person(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse::from(result)))
}

/// GET /{storage_id}
#[instrument(skip(state))]
async fn get_storage(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<StorageView>, ApiError> {
    let view = query_handlers::get_storage_by_id(storage_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// GET /{storage_id}/retrieve
#[instrument(skip(state))]
async fn retrieve(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<FavoriteNumberResponse>, ApiError> {
    let favorite_number = query_handlers::retrieve(storage_id, &*state.event_repository).await?;
    Ok(Json(FavoriteNumberResponse { favorite_number }))
}

/// GET /{storage_id}/favorite-number
#[instrument(skip(state))]
async fn favorite_number(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<FavoriteNumberResponse>, ApiError> {
    let favorite_number =
        query_handlers::favorite_number(storage_id, &*state.event_repository).await?;
    Ok(Json(FavoriteNumberResponse { favorite_number }))
}

/// GET /{storage_id}/owner
#[instrument(skip(state))]
async fn get_owner(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<OwnerResponse>, ApiError> {
    let owner = query_handlers::get_owner(storage_id, &*state.event_repository).await?;
    Ok(Json(OwnerResponse { owner }))
}

/// GET /{storage_id}/people
#[instrument(skip(state))]
async fn list_people(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<Vec<PersonEntry>>, ApiError> {
    let people = query_handlers::list_people(storage_id, &*state.event_repository).await?;
    Ok(Json(people))
}

/// GET /{storage_id}/people/{index}
#[instrument(skip(state))]
async fn get_person_at(
    State(state): State<AppState>,
    Path((storage_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<PersonEntry>, ApiError> {
    let person =
        query_handlers::get_person_at(storage_id, index, &*state.event_repository).await?;
    Ok(Json(person))
}

/// GET /{storage_id}/favorite-numbers?name=
#[instrument(skip(state))]
async fn lookup_favorite_number(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<FavoriteNumberResponse>, ApiError> {
    let favorite_number =
        query_handlers::lookup_favorite_number(storage_id, &query.name, &*state.event_repository)
            .await?;
    Ok(Json(FavoriteNumberResponse { favorite_number }))
}

/// GET /{storage_id}/events
#[instrument(skip(state))]
async fn list_events(
    State(state): State<AppState>,
    Path(storage_id): Path<Uuid>,
) -> Result<Json<Vec<StorageEventView>>, ApiError> {
    let events = query_handlers::list_events(storage_id, &*state.event_repository).await?;
    Ok(Json(events))
}

/// Returns the router for the storage engine.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(deploy_storage))
        .route("/store", post(store_number))
        .route("/add-person", post(add_person))
        .route("/{storage_id}", get(get_storage))
        .route("/{storage_id}/retrieve", get(retrieve))
        .route("/{storage_id}/favorite-number", get(favorite_number))
        .route("/{storage_id}/owner", get(get_owner))
        .route("/{storage_id}/people", get(list_people))
        .route("/{storage_id}/people/{index}", get(get_person_at))
        .route("/{storage_id}/favorite-numbers", get(lookup_favorite_number))
        .route("/{storage_id}/events", get(list_events))
}
