//! SimpleStorage: the storage engine bounded context.
//!
//! Holds one favorite number that only the deploying owner may change,
//! and a person directory that any caller may write to. Every successful
//! write emits exactly one domain event.

pub mod application;
pub mod domain;
