//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum routes, DTOs, and error mapping
//! - `memory` - in-memory subscription repository
//! - `paypal` - PayPal webhook verification API
//! - `postgres` - PostgreSQL subscription repository
//! - `razorpay` - Razorpay subscriptions and orders
//! - `scraper` - page scraping and keyword search

pub mod http;
pub mod memory;
pub mod paypal;
pub mod postgres;
pub mod razorpay;
pub mod scraper;
