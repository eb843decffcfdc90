//! Aggregate roots for the storage engine.

use simple_storage_core::aggregate::AggregateRoot;
use simple_storage_core::clock::Clock;
use simple_storage_core::error::DomainError;
use simple_storage_core::event::EventMetadata;
use simple_storage_core::identity::AccountId;
use uuid::Uuid;

use super::access_guard::AccessGuard;
use super::directory::{PersonDirectory, PersonEntry};
use super::events::{
    NumberStored, PersonAdded, StorageDeployed, StorageEvent, StorageEventKind,
};

/// Operation name reported when a non-owner calls `store`.
pub const STORE_OPERATION: &str = "store";

/// The aggregate root for one deployed storage engine.
#[derive(Debug)]
pub struct SimpleStorage {
    /// Aggregate identifier (the storage id).
    pub id: Uuid,
    /// Current version (committed event count).
    pub(crate) version: i64,
    /// Set by the deployment event; `None` only mid-reconstitution.
    guard: Option<AccessGuard>,
    favorite_number: u64,
    directory: PersonDirectory,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<StorageEvent>,
}

impl SimpleStorage {
    /// Creates an empty aggregate to fold stored events into.
    #[must_use]
    pub(crate) fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            guard: None,
            favorite_number: 0,
            directory: PersonDirectory::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Deploys a new engine owned by `owner`, producing a `StorageDeployed`
    /// event. The favorite number starts at 0 and the directory empty.
    #[must_use]
    pub fn deploy(id: Uuid, owner: AccountId, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let mut storage = Self::new(id);
        storage.raise(
            owner,
            correlation_id,
            clock,
            StorageEventKind::StorageDeployed(StorageDeployed { owner }),
        );
        storage
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Records a new event and folds it into state.
    fn raise(
        &mut self,
        initiated_by: AccountId,
        correlation_id: Uuid,
        clock: &dyn Clock,
        kind: StorageEventKind,
    ) {
        let event = StorageEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                initiated_by,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &StorageEventKind) {
        match kind {
            StorageEventKind::StorageDeployed(payload) => {
                self.guard = Some(AccessGuard::new(payload.owner));
            }
            StorageEventKind::NumberStored(payload) => {
                self.favorite_number = payload.favorite_number;
            }
            StorageEventKind::PersonAdded(payload) => {
                self.directory
                    .insert(payload.name.clone(), payload.favorite_number);
            }
        }
    }

    /// The owner fixed at deployment.
    #[must_use]
    pub fn owner(&self) -> Option<AccountId> {
        self.guard.map(|guard| guard.owner())
    }


    /// Stores a new favorite number, producing a `NumberStored` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `caller` is not the owner. No
    /// state changes and no event is recorded in that case.
    pub fn store(
        &mut self,
        caller: AccountId,
        favorite_number: u64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let Some(guard) = self.guard else {
            return Err(DomainError::Unauthorized {
                operation: STORE_OPERATION,
                caller,
            });
        };
        guard.require(caller, STORE_OPERATION)?;

        self.raise(
            caller,
            correlation_id,
            clock,
            StorageEventKind::NumberStored(NumberStored { favorite_number }),
        );
        Ok(())
    }

    /// The current favorite number; 0 before any `store`.
    #[must_use]
    pub fn retrieve(&self) -> u64 {
        self.favorite_number
    }

    /// Public getter for the stored number. Same value as `retrieve`.
    #[must_use]
    pub fn favorite_number(&self) -> u64 {
        self.favorite_number
    }

    /// Adds or overwrites a person entry, producing a `PersonAdded` event.
    /// Any caller may do this.
    pub fn add_person(
        &mut self,
        caller: AccountId,
        name: String,
        favorite_number: u64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.raise(
            caller,
            correlation_id,
            clock,
            StorageEventKind::PersonAdded(PersonAdded {
                name,
                favorite_number,
            }),
        );
    }

    /// The favorite number stored for `name`, or 0 if it was never added.
    #[must_use]
    pub fn lookup(&self, name: &str) -> u64 {
        self.directory.lookup(name)
    }

    /// Every `add_person` call in order.
    #[must_use]
    pub fn people(&self) -> &[PersonEntry] {
        self.directory.people()
    }

    /// The `index`-th `add_person` call.
    #[must_use]
    pub fn person_at(&self, index: usize) -> Option<&PersonEntry> {
        self.directory.person_at(index)
    }

    /// Number of distinct names in the directory.
    #[must_use]
    pub fn distinct_people(&self) -> usize {
        self.directory.distinct_names()
    }
}

impl AggregateRoot for SimpleStorage {
    type Event = StorageEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn clear_uncommitted_events(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }
}
