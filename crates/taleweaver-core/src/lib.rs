//! Shared domain abstractions for the Taleweaver progression engine.
//!
//! Every bounded context (content authoring, session progress, character
//! management) builds on the traits and types defined here. This crate holds
//! no storage code: the event store behind [`repository::EventRepository`]
//! is supplied by the embedding service.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
