//! Moderation core
//!
//! Domain model for the content moderation queue: items and their status
//! automaton, moderation actions, filters, stats and the shared error
//! taxonomy. No I/O lives here.

pub mod entities;
pub mod error;
pub mod fixtures;
pub mod wire;

pub use error::ModerationError;
