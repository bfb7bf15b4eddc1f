//! Wire types for the moderation action endpoint
//!
//! Shared by the server handler and the console's HTTP gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ModerationAction, ModerationDecision, ModerationItemId, ModerationStatus};

/// Body of `POST /moderation/action/{itemId}`.
///
/// `action` stays a string so unknown values surface as `invalid_action`
/// rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Confirmation returned for a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub action: ModerationAction,
    pub item_id: ModerationItemId,
    pub moderated_by: String,
    pub moderated_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl ActionResponse {
    pub fn confirm(item_id: ModerationItemId, decision: &ModerationDecision) -> Self {
        Self {
            success: true,
            message: format!("Item {} {}", item_id, decision.action.past_tense()),
            action: decision.action,
            item_id,
            moderated_by: decision.moderated_by.clone(),
            moderated_at: decision.moderated_at,
            reason: decision.reason.clone(),
        }
    }

    /// The decision the server recorded
    pub fn decision(&self) -> ModerationDecision {
        ModerationDecision {
            action: self.action,
            moderated_by: self.moderated_by.clone(),
            moderated_at: self.moderated_at,
            reason: self.reason.clone(),
        }
    }
}

/// JSON error body. `code` is the stable reason code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Status that blocked the transition, set on `invalid_state`
    #[serde(
        default,
        rename = "currentStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_status: Option<ModerationStatus>,
}
