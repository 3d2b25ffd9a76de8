//! Trial limits applied to users who have not paid yet.

use serde::{Deserialize, Serialize};

use super::SubscriptionStatus;

pub const DEFAULT_TRIAL_PERIOD_DAYS: i64 = 3;
pub const DEFAULT_TRIAL_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPolicy {
    /// Length of the free trial for newly seen users.
    pub period_days: i64,
    /// Maximum search results returned while on trial.
    pub result_limit: usize,
}

impl TrialPolicy {
    pub fn new(period_days: i64, result_limit: usize) -> Self {
        Self {
            period_days,
            result_limit,
        }
    }

    /// Result cap for a user in `status`, `None` when unlimited.
    pub fn result_limit_for(&self, status: SubscriptionStatus) -> Option<usize> {
        status.is_trial().then_some(self.result_limit)
    }
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRIAL_PERIOD_DAYS, DEFAULT_TRIAL_RESULT_LIMIT)
    }
}
