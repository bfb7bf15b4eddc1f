//! Router assembly

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{auth, handlers, AppState};

/// The action routes, kept apart so the server can rate limit them
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/moderation/action/:item_id", post(handlers::post_action))
        .route("/moderation/action", post(handlers::missing_item_id))
        .route("/moderation/action/", post(handlers::missing_item_id))
}

pub fn build_router(state: AppState, action_routes: Router<AppState>) -> Router {
    let protected = Router::new()
        .route("/moderation/queue", get(handlers::list_queue))
        .route("/moderation/stats", get(handlers::get_stats))
        .route("/moderation/items", post(handlers::submit_item))
        .route("/moderation/items/:item_id", get(handlers::get_item))
        .merge(action_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
