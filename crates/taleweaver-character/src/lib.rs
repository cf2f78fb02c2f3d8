//! Character Management bounded context for the Taleweaver progression engine.
//!
//! Creates characters from a configured stat allocation, accumulates XP,
//! and resolves level-ups against the campaign's leveling table.

pub mod application;
pub mod domain;
