//! Moderation service
//!
//! Validates and applies moderation actions, projects the queue through
//! filters and folds it into stats. Every read and write goes through the
//! `ModerationRepository` port.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use moderation_core::wire::ActionResponse;
use moderation_core::ModerationError;

use crate::domain::entities::{
    normalize_reason, Actor, ModerationAction, ModerationDecision, ModerationFilter,
    ModerationItemId, ModerationQueueItem, ModerationStats, NewModerationItem,
};
use crate::domain::ports::ModerationRepository;
use crate::error::{AppError, DomainError};

/// Longest accepted moderation reason, in characters
pub const MAX_REASON_LEN: usize = 500;

/// Service for the moderation queue
pub struct ModerationService<MR>
where
    MR: ModerationRepository,
{
    items: Arc<MR>,
    auto_approve_after: Duration,
}

impl<MR> ModerationService<MR>
where
    MR: ModerationRepository,
{
    pub fn new(items: Arc<MR>, auto_approve_after: Duration) -> Self {
        Self {
            items,
            auto_approve_after,
        }
    }

    /// Apply a moderation action on behalf of `actor`.
    ///
    /// Checks run in a fixed order: item id present, action valid, actor
    /// allowed, item exists, item still pending. Nothing is looked up before
    /// the action is known to be valid.
    pub async fn apply_action(
        &self,
        actor: &Actor,
        item_id: &str,
        action: &str,
        reason: Option<String>,
    ) -> Result<ActionResponse, AppError> {
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Err(ModerationError::MissingItemId.into());
        }

        let action: ModerationAction = action.parse()?;
        authorize(actor)?;

        let reason = normalize_reason(reason);
        if reason
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_REASON_LEN)
        {
            return Err(ModerationError::Validation(format!(
                "reason must be at most {} characters",
                MAX_REASON_LEN
            ))
            .into());
        }

        let id = ModerationItemId::from(item_id);
        let decision = ModerationDecision::new(action, &actor.id, reason);

        match self.items.record_decision(&id, &decision).await {
            Ok(item) => {
                tracing::info!(
                    item_id = %item.id,
                    actor_id = %actor.id,
                    action = %action,
                    status = %item.status,
                    "Moderation action applied"
                );
                Ok(ActionResponse::confirm(item.id, &decision))
            }
            Err(e) => {
                tracing::warn!(
                    item_id = %id,
                    actor_id = %actor.id,
                    action = %action,
                    error = %e,
                    "Moderation action rejected"
                );
                Err(e.into())
            }
        }
    }

    /// Filtered view of the queue
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &ModerationFilter,
    ) -> Result<Vec<ModerationQueueItem>, AppError> {
        authorize(actor)?;
        let items = self.items.list_all().await?;
        Ok(filter.apply(&items))
    }

    /// Fetch a single item
    pub async fn get(
        &self,
        actor: &Actor,
        item_id: &str,
    ) -> Result<ModerationQueueItem, AppError> {
        authorize(actor)?;
        self.items
            .find_by_id(&ModerationItemId::from(item_id))
            .await?
            .ok_or_else(|| ModerationError::NotFound(item_id.to_string()).into())
    }

    /// Stats over the whole queue as of now
    pub async fn stats(&self, actor: &Actor) -> Result<ModerationStats, AppError> {
        authorize(actor)?;
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> Result<ModerationStats, AppError> {
        let items = self.items.list_all().await?;
        Ok(ModerationStats::from_items(&items, now))
    }

    /// Enqueue submitted content as a pending item
    pub async fn submit(
        &self,
        actor: &Actor,
        new_item: NewModerationItem,
    ) -> Result<ModerationQueueItem, AppError> {
        let item = new_item.into_item(ModerationItemId::new(), Utc::now(), self.auto_approve_after)?;
        let item = self.items.insert(item).await?;
        tracing::info!(
            item_id = %item.id,
            submitted_by = %actor.id,
            content_type = %item.content_type,
            "Item enqueued for moderation"
        );
        Ok(item)
    }

    /// Approve up to `limit` pending items whose deadline has passed.
    ///
    /// Items a moderator decided on in the meantime are skipped, so running
    /// the sweep twice never transitions an item twice.
    pub async fn sweep_expired(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ModerationQueueItem>, AppError> {
        let expired = self.items.find_expired_pending(now, limit).await?;
        let decision = ModerationDecision::auto_approval(now);

        let mut approved = Vec::with_capacity(expired.len());
        for item in expired {
            match self.items.record_decision(&item.id, &decision).await {
                Ok(item) => approved.push(item),
                Err(DomainError::Transition(ModerationError::InvalidState { .. })) => {
                    tracing::debug!(item_id = %item.id, "Item decided before sweep, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(approved)
    }
}

fn authorize(actor: &Actor) -> Result<(), ModerationError> {
    if actor.can_moderate() {
        Ok(())
    } else {
        Err(ModerationError::Unauthorized(format!(
            "role '{}' cannot moderate content",
            actor.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryModerationRepository;
    use crate::domain::entities::{ContentType, ModerationStatus, Role};
    use crate::test_utils::{
        test_actor, test_item, test_item_expired, test_item_with_status, FailingModerationRepository,
    };

    fn create_service(
        repo: InMemoryModerationRepository,
    ) -> (
        ModerationService<InMemoryModerationRepository>,
        Arc<InMemoryModerationRepository>,
    ) {
        let repo = Arc::new(repo);
        (
            ModerationService::new(repo.clone(), Duration::minutes(30)),
            repo,
        )
    }

    async fn stored(repo: &InMemoryModerationRepository, id: &str) -> ModerationQueueItem {
        repo.find_by_id(&ModerationItemId::from(id))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn approve_then_deny_scenario() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));
        let moderator = test_actor("mod1", Role::Moderator);

        let response = service
            .apply_action(&moderator, "m1", "approve", None)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.moderated_by, "mod1");
        assert!((Utc::now() - response.moderated_at).num_seconds().abs() < 5);
        let item = stored(&repo, "m1").await;
        assert_eq!(item.status, ModerationStatus::Approved);
        assert_eq!(item.moderated_by.as_deref(), Some("mod1"));

        let err = service
            .apply_action(&moderator, "m1", "deny", Some("late".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Moderation(ModerationError::InvalidState {
                status: ModerationStatus::Approved,
                ..
            })
        ));
        assert_eq!(stored(&repo, "m1").await, item);
    }

    #[tokio::test]
    async fn quarantine_records_trimmed_reason() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));
        let admin = test_actor("admin1", Role::Admin);

        let response = service
            .apply_action(&admin, "m1", "Quarantine", Some("  phishing link ".to_string()))
            .await
            .unwrap();

        assert_eq!(response.action, ModerationAction::Quarantine);
        assert_eq!(response.reason.as_deref(), Some("phishing link"));
        let item = stored(&repo, "m1").await;
        assert_eq!(item.status, ModerationStatus::Quarantined);
        assert!(item.is_consistent());
    }

    #[tokio::test]
    async fn missing_item_id_is_rejected_first() {
        let (service, _) = create_service(InMemoryModerationRepository::new());
        let viewer = test_actor("viewer1", Role::Viewer);

        let err = service
            .apply_action(&viewer, "  ", "explode", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Moderation(ModerationError::MissingItemId)));
    }

    #[tokio::test]
    async fn invalid_action_is_rejected_before_authorization() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));
        let viewer = test_actor("viewer1", Role::Viewer);

        let err = service
            .apply_action(&viewer, "m1", "delete", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Moderation(ModerationError::InvalidAction(_))
        ));
        assert!(stored(&repo, "m1").await.is_pending());
    }

    #[tokio::test]
    async fn unauthorized_role_is_rejected_before_lookup() {
        let (service, _) = create_service(InMemoryModerationRepository::new());
        let creator = test_actor("creator1", Role::Creator);

        // Unknown id, but authorization fails first
        let err = service
            .apply_action(&creator, "missing", "approve", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Moderation(ModerationError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let (service, _) = create_service(InMemoryModerationRepository::new());
        let moderator = test_actor("mod1", Role::Moderator);

        let err = service
            .apply_action(&moderator, "missing", "approve", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Moderation(ModerationError::NotFound(_))));
    }

    #[tokio::test]
    async fn non_pending_items_are_left_unchanged() {
        for status in [
            ModerationStatus::Approved,
            ModerationStatus::Denied,
            ModerationStatus::Quarantined,
        ] {
            let (service, repo) =
                create_service(InMemoryModerationRepository::with_items([test_item_with_status("m1", status)]));
            let before = stored(&repo, "m1").await;

            let result = service
                .apply_action(&test_actor("mod1", Role::Moderator), "m1", "approve", None)
                .await;

            assert!(result.is_err());
            assert_eq!(stored(&repo, "m1").await, before);
        }
    }

    #[tokio::test]
    async fn overlong_reason_is_rejected() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));

        let err = service
            .apply_action(
                &test_actor("mod1", Role::Moderator),
                "m1",
                "deny",
                Some("x".repeat(MAX_REASON_LEN + 1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Moderation(ModerationError::Validation(_))));
        assert!(stored(&repo, "m1").await.is_pending());
    }

    #[tokio::test]
    async fn concurrent_actions_on_one_item_admit_one() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));
        let service = Arc::new(service);
        let moderator = test_actor("mod1", Role::Moderator);

        let approve = {
            let service = service.clone();
            let moderator = moderator.clone();
            tokio::spawn(async move { service.apply_action(&moderator, "m1", "approve", None).await })
        };
        let deny = {
            let service = service.clone();
            let moderator = moderator.clone();
            tokio::spawn(async move { service.apply_action(&moderator, "m1", "deny", None).await })
        };

        let results = [approve.await.unwrap(), deny.await.unwrap()];
        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(AppError::Moderation(ModerationError::InvalidState { .. }))
        )));

        let item = stored(&repo, "m1").await;
        assert_eq!(item.status, winners[0].action.target_status());
    }

    #[tokio::test]
    async fn list_projects_newest_first() {
        let mut older = test_item("older");
        older.created_at -= Duration::hours(2);
        let mut comment = test_item("comment");
        comment.content_type = ContentType::Comment;
        let (service, _) = create_service(InMemoryModerationRepository::with_items([
            older,
            test_item("newer"),
            comment,
        ]));
        let moderator = test_actor("mod1", Role::Moderator);

        let all = service.list(&moderator, &ModerationFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().unwrap().id.as_str(), "older");

        let comments = service
            .list(
                &moderator,
                &ModerationFilter::new().with_content_type(ContentType::Comment),
            )
            .await
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id.as_str(), "comment");
    }

    #[tokio::test]
    async fn reads_require_moderation_role() {
        let (service, _) = create_service(InMemoryModerationRepository::with_items([test_item("m1")]));
        let viewer = test_actor("viewer1", Role::Viewer);

        assert!(service.list(&viewer, &ModerationFilter::new()).await.is_err());
        assert!(service.stats(&viewer).await.is_err());
        assert!(service.get(&viewer, "m1").await.is_err());
    }

    #[tokio::test]
    async fn stats_scenario_counts_each_status() {
        let (service, _) = create_service(InMemoryModerationRepository::with_items([
            test_item("p1"),
            test_item("p2"),
            test_item_with_status("a1", ModerationStatus::Approved),
            test_item_with_status("d1", ModerationStatus::Denied),
            test_item_with_status("q1", ModerationStatus::Quarantined),
        ]));

        let stats = service
            .stats(&test_actor("mod1", Role::Moderator))
            .await
            .unwrap();

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

    #[tokio::test]
    async fn submit_enqueues_pending_item() {
        let (service, repo) = create_service(InMemoryModerationRepository::new());
        let creator = test_actor("creator1", Role::Creator);

        let item = service
            .submit(
                &creator,
                NewModerationItem {
                    content_id: "post-9".to_string(),
                    content_type: ContentType::Post,
                    creator_id: "creator1".to_string(),
                    creator_name: "Casey".to_string(),
                    creator_avatar: None,
                    content: "first post".to_string(),
                    media_urls: vec!["https://cdn.example.test/a.png".to_string()],
                    category: None,
                    created_at: None,
                    expires_at: None,
                },
            )
            .await
            .unwrap();

        assert!(item.is_pending());
        assert_eq!(item.expires_at - item.created_at, Duration::minutes(30));
        assert_eq!(stored(&repo, item.id.as_str()).await, item);
    }

    #[tokio::test]
    async fn sweep_approves_expired_items_once() {
        let (service, repo) = create_service(InMemoryModerationRepository::with_items([
            test_item_expired("old", 10),
            test_item("fresh"),
        ]));
        let now = Utc::now();

        let first = service.sweep_expired(now, 10).await.unwrap();
        let second = service.sweep_expired(now, 10).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        let old = stored(&repo, "old").await;
        assert!(old.was_auto_approved());
        assert!(stored(&repo, "fresh").await.is_pending());

        let stats = service.stats_at(now).await.unwrap();
        assert_eq!(stats.auto_approved, 1);
        assert_eq!(stats.approved, 1);
    }

    #[tokio::test]
    async fn repository_failures_surface_as_internal_errors() {
        let service = ModerationService::new(
            Arc::new(FailingModerationRepository),
            Duration::minutes(30),
        );
        let moderator = test_actor("mod1", Role::Moderator);

        let err = service
            .apply_action(&moderator, "m1", "approve", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        assert!(service.stats(&moderator).await.is_err());
        assert!(service.sweep_expired(Utc::now(), 10).await.is_err());
    }
}
