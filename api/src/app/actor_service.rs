//! Actor service
//!
//! Handles API key registration and authentication of the actors calling
//! the moderation API.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config::ActorSeed;
use crate::domain::entities::Actor;
use crate::domain::ports::ActorRepository;
use crate::error::AppError;

/// Service for managing actors
pub struct ActorService<AR>
where
    AR: ActorRepository,
{
    actors: Arc<AR>,
}

impl<AR> ActorService<AR>
where
    AR: ActorRepository,
{
    pub fn new(actors: Arc<AR>) -> Self {
        Self { actors }
    }

    /// Register an actor from configuration
    pub async fn register(&self, seed: &ActorSeed) -> Result<Actor, AppError> {
        let actor = Actor::new(&seed.actor_id, &seed.name, seed.role);
        let actor = self
            .actors
            .create(actor, &hash_api_key(&seed.api_key))
            .await?;
        tracing::info!(actor_id = %actor.id, role = %actor.role, "Registered actor");
        Ok(actor)
    }

    /// Resolve a raw API key to its actor
    pub async fn authenticate(&self, api_key: &str) -> Result<Option<Actor>, AppError> {
        Ok(self
            .actors
            .find_by_api_key_hash(&hash_api_key(api_key))
            .await?)
    }
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}
