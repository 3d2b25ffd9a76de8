//! Trial policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::subscription::{TrialPolicy, DEFAULT_TRIAL_PERIOD_DAYS, DEFAULT_TRIAL_RESULT_LIMIT};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrialConfig {
    /// Length of the free trial for new users
    #[serde(default = "default_period_days")]
    pub period_days: i64,

    /// Search links returned per request while on trial
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl TrialConfig {
    pub fn policy(&self) -> TrialPolicy {
        TrialPolicy::new(self.period_days, self.result_limit)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=365).contains(&self.period_days) {
            return Err(ValidationError::OutOfRange("trial.period_days"));
        }
        if self.result_limit == 0 {
            return Err(ValidationError::OutOfRange("trial.result_limit"));
        }
        Ok(())
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            period_days: default_period_days(),
            result_limit: default_result_limit(),
        }
    }
}

fn default_period_days() -> i64 {
    DEFAULT_TRIAL_PERIOD_DAYS
}

fn default_result_limit() -> usize {
    DEFAULT_TRIAL_RESULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_domain_policy() {
        assert_eq!(TrialConfig::default().policy(), TrialPolicy::default());
    }

    #[test]
    fn zero_day_trial_is_rejected() {
        let config = TrialConfig {
            period_days: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::OutOfRange("trial.period_days"))
        );
    }
}
