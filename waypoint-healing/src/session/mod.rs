//! Healing sessions: the bounded retry state machine, its records, and
//! incremental log persistence.

pub mod controller;
pub mod log;
pub mod types;

pub use controller::{recommend, HealingController};
pub use log::SessionLog;
pub use types::{
    AppliedFix, AttemptResult, FixApplier, HealRequest, HealingAttempt, HealingSession,
    SessionStatus,
};
