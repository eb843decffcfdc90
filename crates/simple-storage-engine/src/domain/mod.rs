//! Domain model: the `SimpleStorage` aggregate, its access guard,
//! person directory, commands and events.

pub mod access_guard;
pub mod aggregates;
pub mod commands;
pub mod directory;
pub mod events;
