//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod health;
pub mod moderation;

pub use health::health;
pub use moderation::{get_item, get_stats, list_queue, missing_item_id, post_action, submit_item};
