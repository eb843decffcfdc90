//! Application layer: command and query handlers over an `EventRepository`.

pub mod command_handlers;
pub mod query_handlers;
