//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
///
/// Command methods record new events as uncommitted and fold them into the
/// in-memory state straight away, so reads made after a command observe its
/// effect before persistence. `version` counts committed events only.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of committed events applied).
    fn version(&self) -> i64;

    /// Apply a committed event to mutate internal state (used during reconstitution).
    fn apply(&mut self, event: &Self::Event);

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Marks uncommitted events as committed after persistence.
    fn clear_uncommitted_events(&mut self);
}
