//! Synchronous event system for pattern-store and healing lifecycles.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::WaypointEventHandler;
pub use types::*;
