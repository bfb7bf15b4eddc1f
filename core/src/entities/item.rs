//! Moderation queue item
//!
//! A piece of user-generated content waiting for a human decision. Items
//! enter the queue as `pending` and leave it exactly once, through a
//! moderation action or through expiry-based auto-approval.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModerationError;

/// Actor id stamped on items materialised by the auto-approval sweep
pub const SYSTEM_AUTO_APPROVER: &str = "system:auto-approve";

/// Tolerated drift between a submitter's clock and ours
const MAX_CLOCK_SKEW_MINUTES: i64 = 5;

/// Opaque unique identifier for a queue item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModerationItemId(pub String);

impl ModerationItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModerationItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ModerationItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModerationItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ModerationItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content under review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Comment,
    Message,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Post, ContentType::Comment, ContentType::Message];
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Post => write!(f, "post"),
            ContentType::Comment => write!(f, "comment"),
            ContentType::Message => write!(f, "message"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "post" => Ok(ContentType::Post),
            "comment" => Ok(ContentType::Comment),
            "message" => Ok(ContentType::Message),
            _ => Err(format!("Unknown content type: {}", s)),
        }
    }
}

/// Moderation status. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Denied,
    Quarantined,
}

impl ModerationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Denied => write!(f, "denied"),
            ModerationStatus::Quarantined => write!(f, "quarantined"),
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "denied" => Ok(ModerationStatus::Denied),
            "quarantined" => Ok(ModerationStatus::Quarantined),
            _ => Err(format!("Unknown moderation status: {}", s)),
        }
    }
}

/// Human moderation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Deny,
    Quarantine,
}

impl ModerationAction {
    /// Terminal status this action moves a pending item to
    pub fn target_status(&self) -> ModerationStatus {
        match self {
            ModerationAction::Approve => ModerationStatus::Approved,
            ModerationAction::Deny => ModerationStatus::Denied,
            ModerationAction::Quarantine => ModerationStatus::Quarantined,
        }
    }

    /// Past-tense verb used in confirmations
    pub fn past_tense(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approved",
            ModerationAction::Deny => "denied",
            ModerationAction::Quarantine => "quarantined",
        }
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationAction::Approve => write!(f, "approve"),
            ModerationAction::Deny => write!(f, "deny"),
            ModerationAction::Quarantine => write!(f, "quarantine"),
        }
    }
}

impl std::str::FromStr for ModerationAction {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(ModerationAction::Approve),
            "deny" => Ok(ModerationAction::Deny),
            "quarantine" => Ok(ModerationAction::Quarantine),
            _ => Err(ModerationError::InvalidAction(format!(
                "'{}' is not one of approve, deny, quarantine",
                s
            ))),
        }
    }
}

/// A decision applied to a pending item. Actor and timestamp travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationDecision {
    pub action: ModerationAction,
    pub moderated_by: String,
    pub moderated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ModerationDecision {
    pub fn new(
        action: ModerationAction,
        moderated_by: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            action,
            moderated_by: moderated_by.into(),
            moderated_at: Utc::now(),
            reason: normalize_reason(reason),
        }
    }

    /// Decision recorded by the auto-approval sweep
    pub fn auto_approval(now: DateTime<Utc>) -> Self {
        Self {
            action: ModerationAction::Approve,
            moderated_by: SYSTEM_AUTO_APPROVER.to_string(),
            moderated_at: now,
            reason: Some("Auto-approved after expiry".to_string()),
        }
    }
}

/// Trim the reason and drop it if nothing is left
pub fn normalize_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

/// Item under moderation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationQueueItem {
    pub id: ModerationItemId,
    pub content_id: String,
    pub content_type: ContentType,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Auto-approval deadline if nobody acts first
    pub expires_at: DateTime<Utc>,
    pub status: ModerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ModerationQueueItem {
    pub fn is_pending(&self) -> bool {
        self.status == ModerationStatus::Pending
    }

    /// Pending past its deadline: implicitly approved at `now`
    pub fn is_auto_approved_at(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.expires_at <= now
    }

    /// Approved by the sweep rather than a person
    pub fn was_auto_approved(&self) -> bool {
        self.status == ModerationStatus::Approved
            && self.moderated_by.as_deref() == Some(SYSTEM_AUTO_APPROVER)
    }

    /// `pending` exactly when no actor or timestamp is recorded, and the
    /// deadline lies after creation
    pub fn is_consistent(&self) -> bool {
        let unmoderated = self.moderated_by.is_none() && self.moderated_at.is_none();
        let stamped = self.moderated_by.is_some() && self.moderated_at.is_some();
        let audit_ok = if self.is_pending() { unmoderated } else { stamped };
        audit_ok && self.expires_at > self.created_at
    }

    /// Move a pending item to the action's terminal status.
    ///
    /// Fails without touching the item when it is no longer pending.
    pub fn apply(&mut self, decision: &ModerationDecision) -> Result<(), ModerationError> {
        if !self.is_pending() {
            return Err(ModerationError::InvalidState {
                id: self.id.to_string(),
                status: self.status,
            });
        }

        self.status = decision.action.target_status();
        self.moderated_by = Some(decision.moderated_by.clone());
        self.moderated_at = Some(decision.moderated_at);
        self.reason = decision.reason.clone();
        Ok(())
    }
}

/// Submitted content entering the queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewModerationItem {
    pub content_id: String,
    pub content_type: ContentType,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(default)]
    pub creator_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Defaults to the submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Defaults to `created_at` plus the configured auto-approval window
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewModerationItem {
    /// Resolve defaults and check the item can enter the queue
    pub fn into_item(
        self,
        id: ModerationItemId,
        now: DateTime<Utc>,
        auto_approve_after: Duration,
    ) -> Result<ModerationQueueItem, ModerationError> {
        if self.content_id.trim().is_empty() {
            return Err(ModerationError::Validation(
                "contentId must not be empty".to_string(),
            ));
        }
        if self.creator_id.trim().is_empty() {
            return Err(ModerationError::Validation(
                "creatorId must not be empty".to_string(),
            ));
        }

        let created_at = self.created_at.unwrap_or(now);
        let latest = now
            .checked_add_signed(Duration::minutes(MAX_CLOCK_SKEW_MINUTES))
            .unwrap_or(now);
        if created_at > latest {
            return Err(ModerationError::Validation(
                "createdAt must not be in the future".to_string(),
            ));
        }
        let expires_at = match self.expires_at {
            Some(expires_at) => expires_at,
            None => created_at
                .checked_add_signed(auto_approve_after)
                .ok_or_else(|| ModerationError::Validation("createdAt out of range".to_string()))?,
        };
        if expires_at <= created_at {
            return Err(ModerationError::Validation(
                "expiresAt must be later than createdAt".to_string(),
            ));
        }

        Ok(ModerationQueueItem {
            id,
            content_id: self.content_id,
            content_type: self.content_type,
            creator_id: self.creator_id,
            creator_name: self.creator_name,
            creator_avatar: self.creator_avatar,
            content: self.content,
            media_urls: self.media_urls,
            category: self.category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            created_at,
            expires_at,
            status: ModerationStatus::Pending,
            moderated_by: None,
            moderated_at: None,
            reason: None,
        })
    }
}
