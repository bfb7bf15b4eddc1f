//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{Duration, Utc};

use crate::domain::entities::{
    Actor, ContentType, ModerationItemId, ModerationQueueItem, ModerationStatus, Role,
};

/// Pending post created a minute ago, expiring in a day
pub fn test_item(id: &str) -> ModerationQueueItem {
    let created_at = Utc::now() - Duration::minutes(1);
    ModerationQueueItem {
        id: ModerationItemId::from(id),
        content_id: format!("content-{}", id),
        content_type: ContentType::Post,
        creator_id: "creator-1".to_string(),
        creator_name: "Casey Creator".to_string(),
        creator_avatar: None,
        content: format!("Test content for {}", id),
        media_urls: Vec::new(),
        category: Some("general".to_string()),
        created_at,
        expires_at: created_at + Duration::days(1),
        status: ModerationStatus::Pending,
        moderated_by: None,
        moderated_at: None,
        reason: None,
    }
}

/// Item already in `status`, with a consistent audit trail
pub fn test_item_with_status(id: &str, status: ModerationStatus) -> ModerationQueueItem {
    let mut item = test_item(id);
    item.status = status;
    if status != ModerationStatus::Pending {
        item.moderated_by = Some("mod-0".to_string());
        item.moderated_at = Some(Utc::now());
    }
    item
}

/// Pending item whose deadline passed `minutes_ago` minutes ago
pub fn test_item_expired(id: &str, minutes_ago: i64) -> ModerationQueueItem {
    let mut item = test_item(id);
    item.expires_at = Utc::now() - Duration::minutes(minutes_ago);
    item.created_at = item.expires_at - Duration::days(1);
    item
}

pub fn test_actor(id: &str, role: Role) -> Actor {
    Actor::new(id, format!("Test {}", id), role)
}
