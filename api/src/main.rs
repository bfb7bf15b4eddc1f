//! Moderation API Server
//!
//! Moderators approve, deny or quarantine user-submitted content waiting in
//! a review queue. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use moderation_core::fixtures::FixtureGenerator;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;
mod routes;
mod workers;

#[cfg(test)]
mod test_utils;

use adapters::{InMemoryActorRepository, InMemoryModerationRepository};
use app::{ActorService, ModerationService};
use config::Config;
use workers::AutoApproveWorker;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub moderation_service: Arc<ModerationService<InMemoryModerationRepository>>,
    pub actor_service: Arc<ActorService<InMemoryActorRepository>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moderation_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting moderation API...");

    let config = Config::from_env()?;

    // Create adapters
    let moderation_repo = Arc::new(if config.seed_fixtures {
        let items = FixtureGenerator::new(config.seed_fixture_seed)
            .anchored_at(Utc::now())
            .items(config.seed_fixture_count);
        tracing::info!(
            count = items.len(),
            seed = config.seed_fixture_seed,
            "Seeding queue with fixtures"
        );
        InMemoryModerationRepository::with_items(items)
    } else {
        InMemoryModerationRepository::new()
    });
    let actor_repo = Arc::new(InMemoryActorRepository::new());

    // Create application services
    let moderation_service = Arc::new(ModerationService::new(
        moderation_repo,
        config.auto_approve_after(),
    ));
    let actor_service = Arc::new(ActorService::new(actor_repo));

    if config.actors.is_empty() {
        tracing::warn!("MODERATION_ACTORS is empty, every request will be rejected");
    }
    for seed in &config.actors {
        actor_service
            .register(seed)
            .await
            .with_context(|| format!("Failed to register actor {}", seed.actor_id))?;
    }

    if config.enable_auto_approve_sweep {
        let worker = AutoApproveWorker::new(
            moderation_service.clone(),
            config.auto_approve_sweep_interval_secs,
            config.auto_approve_sweep_batch_size,
        );
        tokio::spawn(async move { worker.start().await });
    }

    let state = AppState {
        moderation_service,
        actor_service,
    };

    // Rate limiting on moderation actions
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .context("Failed to build governor config")?,
    );
    let action_routes = routes::action_routes().layer(GovernorLayer {
        config: governor_config,
    });

    let app = routes::build_router(state, action_routes);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
