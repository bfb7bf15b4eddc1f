//! Unified error types for the moderation API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Repository and business rule errors
//! - `AppError`: Application layer errors (what handlers turn into HTTP responses)
//!
//! The moderation taxonomy itself (`ModerationError`) lives in `moderation-core`
//! so the console can map responses back to the same variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moderation_core::wire::ErrorBody;
use moderation_core::ModerationError;
use thiserror::Error;

/// Domain layer errors - repository and business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    /// A status transition the state machine does not allow
    #[error("{0}")]
    Transition(ModerationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Moderation(#[from] ModerationError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or unknown API key
    #[error("Unauthorized")]
    Unauthorized,
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::AlreadyExists(msg) => AppError::Conflict(msg),
            DomainError::Transition(e) => AppError::Moderation(e),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<&'static str>, Option<String>) {
        match self {
            AppError::Moderation(e) => {
                let status = match e {
                    ModerationError::Unauthorized(_) => StatusCode::FORBIDDEN,
                    ModerationError::InvalidAction(_)
                    | ModerationError::MissingItemId
                    | ModerationError::Validation(_) => StatusCode::BAD_REQUEST,
                    ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
                    ModerationError::InvalidState { .. } => StatusCode::CONFLICT,
                    ModerationError::TransientIo(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                let error = match e {
                    ModerationError::Unauthorized(_) => "Forbidden",
                    ModerationError::InvalidAction(_) => "Invalid action",
                    ModerationError::InvalidState { .. } => "Invalid state",
                    ModerationError::NotFound(_) => "Not found",
                    ModerationError::MissingItemId => "Missing item id",
                    ModerationError::TransientIo(_) => "Service unavailable",
                    ModerationError::Validation(_) => "Validation error",
                };
                (status, error, Some(e.code()), Some(e.to_string()))
            }
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "Already exists",
                None,
                Some(msg.clone()),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request",
                None,
                Some(msg.clone()),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None, None),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let current_status = match &self {
            AppError::Moderation(ModerationError::InvalidState { status, .. }) => Some(*status),
            _ => None,
        };

        let body = Json(ErrorBody {
            error: error.to_string(),
            code: code.map(str::to_string),
            details,
            current_status,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moderation_core::entities::ModerationStatus;

    #[test]
    fn moderation_errors_map_to_contract_statuses() {
        assert_eq!(
            AppError::from(ModerationError::Unauthorized("viewer".into())).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ModerationError::InvalidAction("ban".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ModerationError::MissingItemId).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ModerationError::NotFound("m1".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ModerationError::InvalidState {
                id: "m1".into(),
                status: ModerationStatus::Approved,
            })
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn transition_errors_map_like_moderation_errors() {
        let err = AppError::from(DomainError::Transition(ModerationError::InvalidState {
            id: "m1".into(),
            status: ModerationStatus::Denied,
        }));
        assert!(matches!(
            err,
            AppError::Moderation(ModerationError::InvalidState { .. })
        ));
        let (status, error, code, _) = err.parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error, "Invalid state");
        assert_eq!(code, Some("invalid_state"));

        let missing = AppError::from(DomainError::Transition(ModerationError::NotFound(
            "m1".into(),
        )));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transition_conflict_reports_current_status() {
        let response = AppError::from(DomainError::Transition(ModerationError::InvalidState {
            id: "m1".into(),
            status: ModerationStatus::Quarantined,
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.current_status, Some(ModerationStatus::Quarantined));
    }

    #[test]
    fn duplicate_entities_are_conflicts() {
        let err = AppError::from(DomainError::AlreadyExists("m1".into()));
        let (status, _, code, details) = err.parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(code.is_none());
        assert_eq!(details.as_deref(), Some("m1"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::from(DomainError::Internal("lock poisoned".into()));
        let (status, _, code, details) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(code.is_none());
        assert!(details.is_none());
    }
}
