//! Queue statistics
//!
//! Always recomputed from the current collection, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ModerationQueueItem, ModerationStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationStats {
    pub pending: u64,
    pub approved: u64,
    pub denied: u64,
    pub quarantined: u64,
    pub total: u64,
    /// Pending items past `expiresAt` at fold time, plus items the sweep
    /// already approved. Overlaps `pending` and `approved`; not part of `total`.
    pub auto_approved: u64,
}

impl ModerationStats {
    /// Fold the collection in a single pass
    pub fn from_items<'a, I>(items: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a ModerationQueueItem>,
    {
        items.into_iter().fold(Self::default(), |mut stats, item| {
            match item.status {
                ModerationStatus::Pending => stats.pending += 1,
                ModerationStatus::Approved => stats.approved += 1,
                ModerationStatus::Denied => stats.denied += 1,
                ModerationStatus::Quarantined => stats.quarantined += 1,
            }
            if item.is_auto_approved_at(now) || item.was_auto_approved() {
                stats.auto_approved += 1;
            }
            stats.total += 1;
            stats
        })
    }

    pub fn count(&self, status: ModerationStatus) -> u64 {
        match status {
            ModerationStatus::Pending => self.pending,
            ModerationStatus::Approved => self.approved,
            ModerationStatus::Denied => self.denied,
            ModerationStatus::Quarantined => self.quarantined,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.total == self.pending + self.approved + self.denied + self.quarantined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::item::{
        ContentType, ModerationAction, ModerationDecision, ModerationItemId,
    };
    use crate::fixtures::FixtureGenerator;
    use chrono::Duration;

    fn item(status: ModerationStatus, expires_in: Duration) -> ModerationQueueItem {
        let now = Utc::now();
        let moderated = status != ModerationStatus::Pending;
        ModerationQueueItem {
            id: ModerationItemId::new(),
            content_id: "c".to_string(),
            content_type: ContentType::Post,
            creator_id: "u".to_string(),
            creator_name: "User".to_string(),
            creator_avatar: None,
            content: "text".to_string(),
            media_urls: vec![],
            category: None,
            created_at: now - Duration::days(2),
            expires_at: now + expires_in,
            status,
            moderated_by: moderated.then(|| "mod".to_string()),
            moderated_at: moderated.then(Utc::now),
            reason: None,
        }
    }

    #[test]
    fn counts_one_of_each_status() {
        let later = Duration::hours(1);
        let items = vec![
            item(ModerationStatus::Pending, later),
            item(ModerationStatus::Pending, later),
            item(ModerationStatus::Approved, later),
            item(ModerationStatus::Denied, later),
            item(ModerationStatus::Quarantined, later),
        ];

        let stats = ModerationStats::from_items(&items, Utc::now());

        assert_eq!(
            stats,
            ModerationStats {
                pending: 2,
                approved: 1,
                denied: 1,
                quarantined: 1,
                total: 5,
                auto_approved: 0,
            }
        );
    }

    #[test]
    fn expired_pending_items_count_as_auto_approved() {
        let items = vec![
            item(ModerationStatus::Pending, -Duration::minutes(1)),
            item(ModerationStatus::Pending, Duration::minutes(1)),
            item(ModerationStatus::Denied, -Duration::minutes(1)),
        ];

        let stats = ModerationStats::from_items(&items, Utc::now());

        assert_eq!(stats.pending, 2);
        assert_eq!(stats.auto_approved, 1);
        assert!(stats.is_balanced());
    }

    #[test]
    fn swept_items_are_not_double_counted() {
        let now = Utc::now();
        let mut swept = item(ModerationStatus::Pending, -Duration::minutes(5));
        swept.apply(&ModerationDecision::auto_approval(now)).unwrap();
        let mut human = item(ModerationStatus::Pending, -Duration::minutes(5));
        human
            .apply(&ModerationDecision::new(ModerationAction::Approve, "mod1", None))
            .unwrap();

        let items = vec![swept, human];
        let first = ModerationStats::from_items(&items, now);
        let again = ModerationStats::from_items(&items, now + Duration::hours(1));

        assert_eq!(first.approved, 2);
        assert_eq!(first.auto_approved, 1);
        assert_eq!(first, again);
    }

    #[test]
    fn totals_balance_for_generated_collections() {
        for seed in 0..25 {
            let items = FixtureGenerator::new(seed).items(seed as usize * 3 + 1);
            let stats = ModerationStats::from_items(&items, Utc::now());
            assert!(stats.is_balanced(), "seed {} unbalanced: {:?}", seed, stats);
            assert_eq!(stats.total as usize, items.len());
        }
    }

    #[test]
    fn count_reads_matching_field() {
        let stats = ModerationStats {
            pending: 4,
            approved: 3,
            denied: 2,
            quarantined: 1,
            total: 10,
            auto_approved: 0,
        };
        assert_eq!(stats.count(ModerationStatus::Denied), 2);
        assert_eq!(stats.count(ModerationStatus::Quarantined), 1);
    }
}
