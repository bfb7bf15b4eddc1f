use std::fmt;

use chrono::{DateTime, Utc};
use moderation_core::entities::{ModerationQueueItem, ModerationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
    Warning,
}

/// Label and tone shown next to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: Tone,
}

impl StatusBadge {
    pub fn for_status(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Pending => Self::new("PENDING", Tone::Neutral),
            ModerationStatus::Approved => Self::new("APPROVED", Tone::Positive),
            ModerationStatus::Denied => Self::new("DENIED", Tone::Negative),
            ModerationStatus::Quarantined => Self::new("QUARANTINED", Tone::Warning),
        }
    }

    /// Expired pending items and sweep approvals read as auto-approved
    pub fn for_item(item: &ModerationQueueItem, now: DateTime<Utc>) -> Self {
        if item.is_auto_approved_at(now) || item.was_auto_approved() {
            Self::new("AUTO-APPROVED", Tone::Positive)
        } else {
            Self::for_status(item.status)
        }
    }

    fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label)
    }
}
