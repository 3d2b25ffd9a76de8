//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Stores one row per user in `user_subscriptions`. Status is persisted as
//! its lowercase name; `version` backs optimistic concurrency.

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
use crate::ports::SubscriptionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription record.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: i64,
    subscription_id: Option<String>,
    status: String,
    trial_end: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i32,
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status: SubscriptionStatus = row.status.parse().map_err(|e| {
            DomainError::database(format!("Invalid status value: {}", e))
                .with_detail("user_id", row.user_id.to_string())
        })?;

        // Blank ids written by older clients read back as absent.
        let subscription_id = row
            .subscription_id
            .filter(|id| !id.trim().is_empty())
            .map(SubscriptionId::new)
            .transpose()
            .map_err(|e| DomainError::database(format!("Invalid subscription_id: {}", e)))?;

        Ok(SubscriptionRecord {
            user_id: UserId::new(row.user_id),
            subscription_id,
            status,
            trial_end: Timestamp::from_datetime(row.trial_end),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, subscription_id, status, trial_end, created_at, updated_at, version
    FROM user_subscriptions
"#;

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
                .bind(user_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to find subscription: {}", e))
                })?;

        row.map(SubscriptionRecord::try_from).transpose()
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        // Ids are not unique at the schema level; take the oldest user.
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE subscription_id = $1 ORDER BY user_id ASC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(subscription_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find subscription: {}", e)))?;

        row.map(SubscriptionRecord::try_from).transpose()
    }

    async fn insert_if_absent(
        &self,
        record: &SubscriptionRecord,
    ) -> Result<SubscriptionRecord, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_subscriptions (
                user_id, subscription_id, status, trial_end, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(record.user_id.as_i64())
        .bind(record.subscription_id.as_ref().map(SubscriptionId::as_str))
        .bind(record.status.as_str())
        .bind(record.trial_end.as_datetime())
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .bind(record.version)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert subscription: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(record.clone());
        }

        tracing::debug!(user_id = %record.user_id, "subscription already exists, loading stored row");
        self.find_by_user_id(record.user_id).await?.ok_or_else(|| {
            DomainError::database("Subscription vanished after conflicting insert")
                .with_detail("user_id", record.user_id.to_string())
        })
    }

    async fn update(&self, record: &SubscriptionRecord) -> Result<SubscriptionRecord, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_subscriptions SET
                subscription_id = $3,
                status = $4,
                trial_end = $5,
                updated_at = $6,
                version = version + 1
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(record.user_id.as_i64())
        .bind(record.version)
        .bind(record.subscription_id.as_ref().map(SubscriptionId::as_str))
        .bind(record.status.as_str())
        .bind(record.trial_end.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update subscription: {}", e)))?;

        if result.rows_affected() == 0 {
            let exists: Option<(i32,)> =
                sqlx::query_as("SELECT version FROM user_subscriptions WHERE user_id = $1")
                    .bind(record.user_id.as_i64())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::database(format!("Failed to update subscription: {}", e))
                    })?;

            let err = match exists {
                Some(_) => DomainError::new(
                    ErrorCode::ConcurrentModification,
                    "Subscription was modified concurrently",
                ),
                None => DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found"),
            };
            return Err(err.with_detail("user_id", record.user_id.to_string()));
        }

        let mut saved = record.clone();
        saved.version += 1;
        Ok(saved)
    }
}
