//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionRepository` - per-user subscription records
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod subscription_repository;

pub use subscription_repository::PostgresSubscriptionRepository;
