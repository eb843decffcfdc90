//! Domain events for the storage engine.
//!
//! Payloads carry exactly the documented arguments. The storage id and the
//! calling identity travel in [`EventMetadata`], not in the payload.

use serde::{Deserialize, Serialize};
use simple_storage_core::event::{DomainEvent, EventMetadata};
use simple_storage_core::identity::AccountId;

/// Emitted once, when a storage engine is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDeployed {
    /// The deployer, fixed as owner for the engine's lifetime.
    pub owner: AccountId,
}

/// Emitted when the owner stores a new favorite number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberStored {
    /// The stored value.
    pub favorite_number: u64,
}

/// Emitted when any caller adds or overwrites a person entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAdded {
    /// The person's name.
    pub name: String,
    /// The person's favorite number.
    pub favorite_number: u64,
}

/// Event type identifier for [`StorageDeployed`].
pub const STORAGE_DEPLOYED_EVENT_TYPE: &str = "storage.deployed";

/// Event type identifier for [`NumberStored`].
pub const NUMBER_STORED_EVENT_TYPE: &str = "storage.number_stored";

/// Event type identifier for [`PersonAdded`].
pub const PERSON_ADDED_EVENT_TYPE: &str = "storage.person_added";

/// Event payload variants for the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageEventKind {
    /// The engine has been deployed.
    StorageDeployed(StorageDeployed),
    /// The favorite number has been stored.
    NumberStored(NumberStored),
    /// A person entry has been added.
    PersonAdded(PersonAdded),
}

impl StorageEventKind {
    /// The event type identifier for this payload.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::StorageDeployed(_) => STORAGE_DEPLOYED_EVENT_TYPE,
            Self::NumberStored(_) => NUMBER_STORED_EVENT_TYPE,
            Self::PersonAdded(_) => PERSON_ADDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the storage engine.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StorageEventKind,
}

impl DomainEvent for StorageEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StorageEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
