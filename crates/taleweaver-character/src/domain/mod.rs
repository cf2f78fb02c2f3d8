//! Domain layer for the Character Management context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod leveling;
pub mod rules;
pub mod sheet;
pub mod stats;
