use std::env;

use moderation_core::entities::Role;

/// An API key entry from `MODERATION_ACTORS`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorSeed {
    pub api_key: String,
    pub actor_id: String,
    pub role: Role,
    pub name: String,
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Actors allowed to call the API, parsed from `MODERATION_ACTORS`
    pub actors: Vec<ActorSeed>,
    /// Window after submission before an untouched item counts as approved
    pub auto_approve_after_minutes: i64,
    /// Materialise auto-approvals with a background sweep
    pub enable_auto_approve_sweep: bool,
    pub auto_approve_sweep_interval_secs: u64,
    pub auto_approve_sweep_batch_size: usize,
    /// Seed the queue with deterministic fixtures (development only)
    pub seed_fixtures: bool,
    pub seed_fixture_count: usize,
    pub seed_fixture_seed: u64,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 8080)?,
            actors: parse_actors(&env::var("MODERATION_ACTORS").unwrap_or_default())?,
            auto_approve_after_minutes: env_or("AUTO_APPROVE_AFTER_MINUTES", 24 * 60)?.max(1),
            enable_auto_approve_sweep: env_or("ENABLE_AUTO_APPROVE_SWEEP", false)?,
            auto_approve_sweep_interval_secs: env_or("AUTO_APPROVE_SWEEP_INTERVAL_SECS", 300)?
                .max(10),
            auto_approve_sweep_batch_size: env_or("AUTO_APPROVE_SWEEP_BATCH_SIZE", 50)?.max(1),
            seed_fixtures: env_or("SEED_FIXTURES", false)?,
            seed_fixture_count: env_or("SEED_FIXTURE_COUNT", 25)?,
            seed_fixture_seed: env_or("SEED_FIXTURE_SEED", 42)?,
            rate_limit_per_second: env_or("RATE_LIMIT_PER_SECOND", 5)?.max(1),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", 20)?.max(1),
        })
    }

    pub fn auto_approve_after(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.auto_approve_after_minutes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            actors: Vec::new(),
            auto_approve_after_minutes: 24 * 60,
            enable_auto_approve_sweep: false,
            auto_approve_sweep_interval_secs: 300,
            auto_approve_sweep_batch_size: 50,
            seed_fixtures: false,
            seed_fixture_count: 25,
            seed_fixture_seed: 42,
            rate_limit_per_second: 5,
            rate_limit_burst: 20,
        }
    }
}

/// Parse `<api-key>:<actor-id>:<role>[:<name>]` entries separated by commas
pub fn parse_actors(raw: &str) -> anyhow::Result<Vec<ActorSeed>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.splitn(4, ':').map(str::trim).collect();
            if parts.len() < 3 || parts[..3].iter().any(|p| p.is_empty()) {
                anyhow::bail!(
                    "Invalid MODERATION_ACTORS entry '{}', expected <api-key>:<actor-id>:<role>[:<name>]",
                    entry
                );
            }
            let role = parts[2]
                .parse::<Role>()
                .map_err(|e| anyhow::anyhow!("Invalid MODERATION_ACTORS entry: {}", e))?;
            Ok(ActorSeed {
                api_key: parts[0].to_string(),
                actor_id: parts[1].to_string(),
                role,
                name: parts
                    .get(3)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(&parts[1])
                    .to_string(),
            })
        })
        .collect()
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
