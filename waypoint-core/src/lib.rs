//! # waypoint-core
//!
//! Core types shared across the Waypoint engine: layered configuration,
//! per-subsystem error enums, the synchronous event system, and the
//! cooperative cancellation token.

pub mod config;
pub mod errors;
pub mod events;
pub mod traits;
