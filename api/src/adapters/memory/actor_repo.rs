//! In-memory adapter for ActorRepository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Actor;
use crate::domain::ports::ActorRepository;
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryActorRepository {
    actors: RwLock<HashMap<String, Actor>>,
    by_api_key: RwLock<HashMap<String, String>>,
}

impl InMemoryActorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorRepository for InMemoryActorRepository {
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<Actor>, DomainError> {
        let by_api_key = self.by_api_key.read().await;
        let Some(id) = by_api_key.get(hash) else {
            return Ok(None);
        };
        Ok(self.actors.read().await.get(id).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Actor>, DomainError> {
        Ok(self.actors.read().await.get(id).cloned())
    }

    async fn create(&self, actor: Actor, api_key_hash: &str) -> Result<Actor, DomainError> {
        let mut by_api_key = self.by_api_key.write().await;
        if by_api_key.contains_key(api_key_hash) {
            return Err(DomainError::AlreadyExists(
                "API key is already registered".to_string(),
            ));
        }

        let mut actors = self.actors.write().await;
        by_api_key.insert(api_key_hash.to_string(), actor.id.clone());
        actors.insert(actor.id.clone(), actor.clone());
        Ok(actor)
    }
}
