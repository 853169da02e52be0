//! Shared trait definitions.

pub mod cancellation;

pub use cancellation::{Cancellable, CancellationToken};
