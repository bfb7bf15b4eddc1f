//! In-memory adapters
//!
//! The queue lives for the lifetime of the process. Storage behind the
//! action endpoint is opaque to its callers, so a durable adapter can
//! replace these without touching the services.

mod actor_repo;
mod moderation_repo;

pub use actor_repo::InMemoryActorRepository;
pub use moderation_repo::InMemoryModerationRepository;
