//! GetSubscriptionHandler - read a user's subscription without side effects.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::subscription::{SubscriptionError, SubscriptionRecord};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct GetSubscriptionResult {
    pub record: SubscriptionRecord,
    /// Validity at the time of the read.
    pub is_active: bool,
}

pub struct GetSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<GetSubscriptionResult, SubscriptionError> {
        let record = self
            .repository
            .find_by_user_id(query.user_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found_for_user(query.user_id))?;

        let is_active = record.is_valid(Timestamp::now());
        Ok(GetSubscriptionResult { record, is_active })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;

    #[tokio::test]
    async fn returns_record_with_validity() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        repo.seed(SubscriptionRecord::start_trial(UserId::new(1), Timestamp::now(), 3))
            .await;

        let result = GetSubscriptionHandler::new(repo)
            .handle(GetSubscriptionQuery {
                user_id: UserId::new(1),
            })
            .await
            .unwrap();

        assert!(result.is_active);
        assert!(result.record.status.is_trial());
    }

    #[tokio::test]
    async fn lapsed_trial_reads_inactive_without_writing() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        repo.seed(SubscriptionRecord::start_trial(
            UserId::new(2),
            Timestamp::now().minus_days(7),
            3,
        ))
        .await;

        let result = GetSubscriptionHandler::new(repo.clone())
            .handle(GetSubscriptionQuery {
                user_id: UserId::new(2),
            })
            .await
            .unwrap();

        assert!(!result.is_active);
        assert!(result.record.status.is_trial());
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_and_not_created() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let result = GetSubscriptionHandler::new(repo.clone())
            .handle(GetSubscriptionQuery {
                user_id: UserId::new(3),
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            SubscriptionError::NotFoundForUser(UserId::new(3))
        );
        assert!(repo.is_empty().await);
    }
}
