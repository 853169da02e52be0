//! # waypoint-mapping
//!
//! The step-mapping half of the Waypoint engine: translates a line of
//! human-written Journey step text into a structured test primitive using a
//! strict three-tier resolution order (explicit hints, fixed pattern library,
//! learned pattern store).

pub mod glossary;
pub mod hints;
pub mod ir;
pub mod llkb;
pub mod mapper;
pub mod patterns;
