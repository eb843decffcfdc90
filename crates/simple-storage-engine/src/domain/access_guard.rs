//! Access guard for owner-only operations.

use simple_storage_core::error::DomainError;
use simple_storage_core::identity::AccountId;

/// Decides whether a caller may perform a guarded operation.
///
/// Only reads the owner fixed at deployment; it never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGuard {
    owner: AccountId,
}

impl AccessGuard {
    /// Creates a guard for the given owner.
    #[must_use]
    pub const fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    /// The owner this guard admits.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// Returns `true` iff `caller` is the owner.
    #[must_use]
    pub fn authorize(&self, caller: AccountId) -> bool {
        caller == self.owner
    }

    /// Fails with `Unauthorized` naming `operation` unless `caller` is the owner.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if `caller` is not the owner.
    pub fn require(&self, caller: AccountId, operation: &'static str) -> Result<(), DomainError> {
        if self.authorize(caller) {
            Ok(())
        } else {
            Err(DomainError::Unauthorized { operation, caller })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_admits_owner() {
        let owner = AccountId::random();
        let guard = AccessGuard::new(owner);

        assert!(guard.authorize(owner));
        assert!(guard.require(owner, "store").is_ok());
    }

    #[test]
    fn test_authorize_rejects_everyone_else() {
        let guard = AccessGuard::new(AccountId::random());
        let stranger = AccountId::random();

        assert!(!guard.authorize(stranger));
        match guard.require(stranger, "store").unwrap_err() {
            DomainError::Unauthorized { operation, caller } => {
                assert_eq!(operation, "store");
                assert_eq!(caller, stranger);
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }
}
