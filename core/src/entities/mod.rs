//! Domain entities
//!
//! Pure models shared by the action endpoint and the console.

pub mod actor;
pub mod filter;
pub mod item;
pub mod stats;

pub use actor::{Actor, Role};
pub use filter::{ModerationFilter, SortOrder};
pub use item::{
    normalize_reason, ContentType, ModerationAction, ModerationDecision, ModerationItemId,
    ModerationQueueItem, ModerationStatus, NewModerationItem, SYSTEM_AUTO_APPROVER,
};
pub use stats::ModerationStats;
