//! Content Authoring bounded context for the Taleweaver progression engine.
//!
//! Owns the authored campaign document (beats, threat track, filler seeds),
//! parses it from JSON or YAML in either the current or legacy schema,
//! validates it before publish, and freezes it once published.

pub mod application;
pub mod domain;
