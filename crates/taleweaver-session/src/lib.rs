//! Session & Progress bounded context for the Taleweaver progression engine.
//!
//! Tracks a play-through of a published campaign: which beats are open,
//! which filler seeds are spent, and how far the threat has escalated.

pub mod application;
pub mod domain;
