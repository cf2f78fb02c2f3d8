//! Application layer for the Content Authoring context.

pub mod command_handlers;
pub mod query_handlers;
