//! Commands for the storage engine.

use simple_storage_core::command::Command;
use simple_storage_core::identity::AccountId;
use uuid::Uuid;

/// Command to deploy a new storage engine owned by the deployer.
#[derive(Debug, Clone)]
pub struct DeployStorage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The deploying identity; becomes the owner.
    pub deployer: AccountId,
}

impl Command for DeployStorage {
    fn command_type(&self) -> &'static str {
        "storage.deploy"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> AccountId {
        self.deployer
    }
}

/// Command to store a new favorite number. Owner only.
#[derive(Debug, Clone)]
pub struct StoreNumber {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The storage engine identifier.
    pub storage_id: Uuid,
    /// The calling identity.
    pub caller: AccountId,
    /// The value to store.
    pub favorite_number: u64,
}

impl Command for StoreNumber {
    fn command_type(&self) -> &'static str {
        "storage.store"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> AccountId {
        self.caller
    }
}

/// Command to add or overwrite a person entry. Open to any caller.
#[derive(Debug, Clone)]
pub struct AddPerson {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The storage engine identifier.
    pub storage_id: Uuid,
    /// The calling identity.
    pub caller: AccountId,
    /// The person's name.
    pub name: String,
    /// The person's favorite number.
    pub favorite_number: u64,
}

impl Command for AddPerson {
    fn command_type(&self) -> &'static str {
        "storage.add_person"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn caller(&self) -> AccountId {
        self.caller
    }
}
