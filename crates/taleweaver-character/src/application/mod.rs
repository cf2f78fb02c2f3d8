//! Application layer for the Character Management context.

pub mod command_handlers;
pub mod query_handlers;
