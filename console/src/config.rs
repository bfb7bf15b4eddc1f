use std::env;
use std::time::Duration;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    /// Moderator the console acts as; the server resolves the same actor from the key
    pub actor_id: String,
    pub action_timeout_secs: u64,
    /// Viewport width in columns used for pane layout
    pub width: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_url: env::var("MODERATION_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            api_key: env::var("MODERATION_API_KEY")
                .context("MODERATION_API_KEY not set. Ask an admin for a moderator key.")?,
            actor_id: env::var("MODERATION_ACTOR_ID").context("MODERATION_ACTOR_ID not set")?,
            action_timeout_secs: env_or("ACTION_TIMEOUT_SECS", 10)?.max(1),
            width: env_or("CONSOLE_WIDTH", 120)?,
        })
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_secs(self.action_timeout_secs)
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
