//! Subscription repository port.
//!
//! Persists one [`SubscriptionRecord`] per user. Writes are guarded by the
//! record's `version` so concurrent webhook deliveries and access checks
//! cannot silently overwrite each other.

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::subscription::SubscriptionRecord;
use async_trait::async_trait;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Primary lookup. Returns `None` for users never seen before.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError>;

    /// Lookup by provider subscription id, used by webhooks that carry no user.
    async fn find_by_subscription_id(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<SubscriptionRecord>, DomainError>;

    /// Inserts the record unless one already exists for its user.
    ///
    /// Returns whichever record is stored afterwards, so two racing callers
    /// converge on the same row.
    async fn insert_if_absent(
        &self,
        record: &SubscriptionRecord,
    ) -> Result<SubscriptionRecord, DomainError>;

    /// Writes the record if the stored version still equals `record.version`.
    ///
    /// Returns the record with its new version.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if another writer got there first
    /// - `SubscriptionNotFound` if no row exists for the user
    /// - `DatabaseError` on persistence failure
    async fn update(&self, record: &SubscriptionRecord) -> Result<SubscriptionRecord, DomainError>;
}
