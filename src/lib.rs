//! Odin Crawler - billing and access control backend
//!
//! Tracks each user's free trial or paid subscription, gates the crawl
//! endpoint on it, and keeps subscription state in step with Razorpay and
//! PayPal webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
