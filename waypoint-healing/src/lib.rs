//! # waypoint-healing
//!
//! The self-healing half of the Waypoint engine: classifies why a generated
//! test failed, selects candidate repairs under an allow/forbid policy, and
//! drives a bounded retry state machine that applies fixes, re-runs the test,
//! and feeds confirmed outcomes back into the learned pattern store.

pub mod classify;
pub mod report;
pub mod rules;
pub mod runner;
pub mod session;
