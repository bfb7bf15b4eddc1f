//! Console views
//!
//! Plain-text renderers over provider state. Views read from the provider
//! and trigger actions through it; they never change items directly.

pub mod badge;
pub mod layout;
pub mod queue;
pub mod stats;

pub use badge::StatusBadge;
pub use layout::PaneLayout;
pub use queue::{render_detail, render_rows, QueueView};
pub use stats::StatsView;

/// Cut `s` to at most `max_chars` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
