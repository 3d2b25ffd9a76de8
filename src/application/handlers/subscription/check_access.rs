//! CheckAccessHandler - Query handler for the access gate.
//!
//! Resolves (or lazily creates) the user's record, expires a lapsed trial,
//! and decides access. The reconciliation write happens before the decision
//! is returned, so a denied `trial_expired` is always persisted.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::subscription::{
    AccessDecision, SubscriptionError, SubscriptionRecord, TrialPolicy,
};
use crate::ports::SubscriptionRepository;

use super::record_store::{load_or_start_trial, write_with_retry};

#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    pub decision: AccessDecision,
    /// Record as stored after reconciliation.
    pub record: SubscriptionRecord,
}

pub struct CheckAccessHandler {
    repository: Arc<dyn SubscriptionRepository>,
    policy: TrialPolicy,
}

impl CheckAccessHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>, policy: TrialPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> TrialPolicy {
        self.policy
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, SubscriptionError> {
        self.handle_at(query, Timestamp::now()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit clock.
    pub async fn handle_at(
        &self,
        query: CheckAccessQuery,
        now: Timestamp,
    ) -> Result<CheckAccessResult, SubscriptionError> {
        let repo = self.repository.as_ref();
        let record = load_or_start_trial(repo, query.user_id, now, self.policy.period_days).await?;

        let (record, expired_now) =
            write_with_retry(repo, record, |r| r.expire_trial_if_due(now)).await?;

        if expired_now {
            tracing::info!(user_id = %query.user_id, "trial expired");
        }

        let decision = AccessDecision::evaluate(&record, now, expired_now);
        Ok(CheckAccessResult { decision, record })
    }
}
