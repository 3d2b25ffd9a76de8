//! Shared read-modify-write helpers for subscription records.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::subscription::{SubscriptionRecord, TransitionOutcome};
use crate::ports::SubscriptionRepository;

/// Attempts before a version conflict is surfaced to the caller.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Mutation results that know whether the record needs writing.
pub trait RecordChange {
    fn changed(&self) -> bool;
}

impl RecordChange for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl RecordChange for TransitionOutcome {
    fn changed(&self) -> bool {
        self.is_changed()
    }
}

/// Returns the user's record, creating a trial record on first sight.
pub async fn load_or_start_trial(
    repo: &dyn SubscriptionRepository,
    user_id: UserId,
    now: Timestamp,
    trial_days: i64,
) -> Result<SubscriptionRecord, DomainError> {
    if let Some(record) = repo.find_by_user_id(user_id).await? {
        return Ok(record);
    }
    let record = repo
        .insert_if_absent(&SubscriptionRecord::start_trial(user_id, now, trial_days))
        .await?;
    tracing::info!(user_id = %user_id, status = %record.status, "subscription record created");
    Ok(record)
}

/// Applies `mutate` and persists the result, reloading on version conflicts.
///
/// `mutate` is re-run against the freshly loaded record after each conflict,
/// so guards always see the latest committed state. Nothing is written when
/// the mutation reports no change.
pub async fn write_with_retry<T, F>(
    repo: &dyn SubscriptionRepository,
    mut record: SubscriptionRecord,
    mut mutate: F,
) -> Result<(SubscriptionRecord, T), DomainError>
where
    T: RecordChange,
    F: FnMut(&mut SubscriptionRecord) -> T,
{
    let mut attempt = 1;
    loop {
        let change = mutate(&mut record);
        if !change.changed() {
            return Ok((record, change));
        }

        match repo.update(&record).await {
            Ok(saved) => return Ok((saved, change)),
            Err(err) if err.is_conflict() && attempt < MAX_WRITE_ATTEMPTS => {
                tracing::debug!(
                    user_id = %record.user_id,
                    attempt,
                    "version conflict, reloading subscription"
                );
                attempt += 1;
                record = repo.find_by_user_id(record.user_id).await?.ok_or_else(|| {
                    DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription vanished")
                        .with_detail("user_id", record.user_id.to_string())
                })?;
            }
            Err(err) => return Err(err),
        }
    }
}
