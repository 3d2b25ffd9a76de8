//! AuthorizeActionHandler - gate in front of protected crawler actions.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::subscription::{
    AccessDecision, SubscriptionError, SubscriptionStatus, TrialPolicy,
};
use crate::ports::SubscriptionRepository;

use super::check_access::{CheckAccessHandler, CheckAccessQuery};

#[derive(Debug, Clone)]
pub struct AuthorizeActionCommand {
    pub user_id: UserId,
}

/// Permission to run a protected action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedAction {
    pub user_id: UserId,
    pub status: SubscriptionStatus,
    /// Maximum results the action may return, `None` when unlimited.
    pub result_limit: Option<usize>,
}

impl AuthorizedAction {
    pub fn cap<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(limit) = self.result_limit {
            items.truncate(limit);
        }
        items
    }
}

pub struct AuthorizeActionHandler {
    access: CheckAccessHandler,
}

impl AuthorizeActionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>, policy: TrialPolicy) -> Self {
        Self {
            access: CheckAccessHandler::new(repository, policy),
        }
    }

    pub async fn handle(
        &self,
        cmd: AuthorizeActionCommand,
    ) -> Result<AuthorizedAction, SubscriptionError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        cmd: AuthorizeActionCommand,
        now: Timestamp,
    ) -> Result<AuthorizedAction, SubscriptionError> {
        let result = self
            .access
            .handle_at(CheckAccessQuery { user_id: cmd.user_id }, now)
            .await?;

        match result.decision {
            AccessDecision::Granted { status, .. } => Ok(AuthorizedAction {
                user_id: cmd.user_id,
                status,
                result_limit: self.access.policy().result_limit_for(status),
            }),
            AccessDecision::Denied(reason) => {
                tracing::info!(user_id = %cmd.user_id, reason = reason.code(), "action denied");
                Err(SubscriptionError::access_denied(reason))
            }
        }
    }
}
