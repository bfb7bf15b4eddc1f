//! Application layer
//!
//! Use cases over the moderation queue. Services coordinate between domain
//! entities and the repository ports.

pub mod actor_service;
pub mod moderation_service;

pub use actor_service::ActorService;
pub use moderation_service::ModerationService;
