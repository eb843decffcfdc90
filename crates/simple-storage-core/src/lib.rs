//! SimpleStorage Core: shared domain abstractions.
//!
//! This crate defines the traits and types the storage engine and its
//! hosts depend on: aggregates, commands, events, caller identities and
//! the event repository seam. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod identity;
pub mod repository;
