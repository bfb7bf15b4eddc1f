use std::fmt;

use moderation_core::entities::ModerationStats;

/// Stats panel
pub struct StatsView<'a>(pub &'a ModerationStats);

impl fmt::Display for StatsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Queue statistics")?;
        writeln!(f, "  Pending       {:>6}", stats.pending)?;
        writeln!(f, "  Approved      {:>6}", stats.approved)?;
        writeln!(f, "  Denied        {:>6}", stats.denied)?;
        writeln!(f, "  Quarantined   {:>6}", stats.quarantined)?;
        writeln!(f, "  Total         {:>6}", stats.total)?;
        write!(f, "  Auto-approved {:>6}", stats.auto_approved)
    }
}
