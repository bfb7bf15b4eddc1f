//! Moderation error taxonomy
//!
//! Shared by the action endpoint and the console so that a rejection keeps
//! its meaning on both sides of the wire. Every variant carries a stable
//! reason code (see [`ModerationError::code`]).

use thiserror::Error;

use crate::entities::ModerationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    /// Actor lacks the admin or moderator role
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Action not in {approve, deny, quarantine}
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Item is no longer pending
    #[error("Item {id} is {status}, only pending items can be moderated")]
    InvalidState { id: String, status: ModerationStatus },

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Missing item id")]
    MissingItemId,

    /// Remote call failed for network or server reasons; safe to retry
    #[error("Transient I/O error: {0}")]
    TransientIo(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ModerationError {
    /// Stable reason code carried in error responses
    pub fn code(&self) -> &'static str {
        match self {
            ModerationError::Unauthorized(_) => "unauthorized",
            ModerationError::InvalidAction(_) => "invalid_action",
            ModerationError::InvalidState { .. } => "invalid_state",
            ModerationError::NotFound(_) => "not_found",
            ModerationError::MissingItemId => "missing_item_id",
            ModerationError::TransientIo(_) => "transient_io",
            ModerationError::Validation(_) => "validation",
        }
    }

    /// Only transient failures may be retried by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModerationError::TransientIo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(ModerationError::TransientIo("timeout".to_string()).is_retryable());
        assert!(!ModerationError::NotFound("m1".to_string()).is_retryable());
        assert!(!ModerationError::InvalidState {
            id: "m1".to_string(),
            status: ModerationStatus::Approved,
        }
        .is_retryable());
    }

    #[test]
    fn invalid_state_message_names_status() {
        let err = ModerationError::InvalidState {
            id: "m1".to_string(),
            status: ModerationStatus::Denied,
        };
        assert_eq!(
            err.to_string(),
            "Item m1 is denied, only pending items can be moderated"
        );
        assert_eq!(err.code(), "invalid_state");
    }
}
