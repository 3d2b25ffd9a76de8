//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers, and routes; they share
//! one [`AppState`] and are assembled by [`api_router`].

pub mod app_state;
pub mod crawl;
pub mod error;
pub mod router;
pub mod subscription;

pub use app_state::{AppState, BillingSettings};
pub use error::{ApiError, ErrorEnvelope, WebhookApiError};
pub use router::{api_router, health, trim_trailing_slash};
