//! Domain layer for the Session & Progress context.

pub mod aggregates;
pub mod availability;
pub mod commands;
pub mod episode;
pub mod error;
pub mod events;
pub mod progress;
pub mod threat_machine;
