//! API key authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::AppState;

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Authentication middleware
///
/// Resolves the API key to an actor and injects it into request extensions.
/// Role checks are left to the services.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;

    let actor = state
        .actor_service
        .authenticate(api_key)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Rejected unknown API key");
            AppError::Unauthorized
        })?;

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
