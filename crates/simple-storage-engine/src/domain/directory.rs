//! Person directory: name-keyed favorite numbers plus an ordered record.

use std::collections::HashMap;

use serde::Serialize;

/// A (name, favorite number) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonEntry {
    /// The person's name.
    pub name: String,
    /// The person's favorite number.
    pub favorite_number: u64,
}

/// Name-indexed favorite numbers.
///
/// The map is authoritative for lookups and is last-write-wins. The ordered
/// record grows by one entry per insert, so a name written twice appears
/// twice there. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct PersonDirectory {
    by_name: HashMap<String, u64>,
    people: Vec<PersonEntry>,
}

impl PersonDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name` and appends to the ordered record.
    pub fn insert(&mut self, name: String, favorite_number: u64) {
        self.by_name.insert(name.clone(), favorite_number);
        self.people.push(PersonEntry {
            name,
            favorite_number,
        });
    }

    /// The stored number for `name`, or 0 if it was never added.
    #[must_use]
    pub fn lookup(&self, name: &str) -> u64 {
        self.by_name.get(name).copied().unwrap_or_default()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn people(&self) -> &[PersonEntry] {
        &self.people
    }

    /// Entry at `index` in insertion order.
    #[must_use]
    pub fn person_at(&self, index: usize) -> Option<&PersonEntry> {
        self.people.get(index)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn distinct_names(&self) -> usize {
        self.by_name.len()
    }
}
