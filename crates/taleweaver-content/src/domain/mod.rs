//! Domain layer for the Content Authoring context.

pub mod aggregates;
pub mod beat;
pub mod campaign;
pub mod commands;
pub mod document;
pub mod events;
pub mod legacy;
pub mod limits;
pub mod threat;
pub mod validation;
