//! In-memory subscription repository.
//!
//! Mirrors the PostgreSQL adapter's semantics (unique user, versioned
//! updates) so handlers and HTTP routes can be exercised without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::SubscriptionRecord;
use crate::ports::SubscriptionRepository;

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<UserId, SubscriptionRecord>>,
    writes: AtomicUsize,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record verbatim, bypassing version checks.
    pub async fn seed(&self, record: SubscriptionRecord) {
        self.records.write().await.insert(record.user_id, record);
    }

    /// Number of successful inserts and updates.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        Ok(self.records.read().await.get(&user_id).cloned())
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.subscription_id.as_ref() == Some(subscription_id))
            .min_by_key(|r| r.user_id)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        record: &SubscriptionRecord,
    ) -> Result<SubscriptionRecord, DomainError> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get(&record.user_id) {
            return Ok(existing.clone());
        }
        records.insert(record.user_id, record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }

    async fn update(&self, record: &SubscriptionRecord) -> Result<SubscriptionRecord, DomainError> {
        let mut records = self.records.write().await;
        let stored = records.get_mut(&record.user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
                .with_detail("user_id", record.user_id.to_string())
        })?;

        if stored.version != record.version {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Subscription was modified concurrently",
            )
            .with_detail("user_id", record.user_id.to_string()));
        }

        let mut saved = record.clone();
        saved.version += 1;
        *stored = saved.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }
}
