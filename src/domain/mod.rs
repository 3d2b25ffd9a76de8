//! Domain layer containing business logic and domain types.
//!
//! - `foundation` - shared primitives (ids, timestamps, errors, state machine)
//! - `subscription` - trial/paid lifecycle, access decisions, provider events

pub mod foundation;
pub mod subscription;
