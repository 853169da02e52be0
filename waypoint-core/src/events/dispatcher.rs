//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::WaypointEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec,
/// which is effectively free.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn WaypointEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn WaypointEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn WaypointEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    // ---- Pattern Lifecycle ----
    pub fn emit_pattern_learned(&self, event: &PatternLearnedEvent) {
        self.emit(|h| h.on_pattern_learned(event));
    }

    pub fn emit_pattern_reinforced(&self, event: &PatternReinforcedEvent) {
        self.emit(|h| h.on_pattern_reinforced(event));
    }

    pub fn emit_pattern_weakened(&self, event: &PatternWeakenedEvent) {
        self.emit(|h| h.on_pattern_weakened(event));
    }

    pub fn emit_pattern_pruned(&self, event: &PatternPrunedEvent) {
        self.emit(|h| h.on_pattern_pruned(event));
    }

    // ---- Mapping ----
    pub fn emit_step_blocked(&self, event: &StepBlockedEvent) {
        self.emit(|h| h.on_step_blocked(event));
    }

    // ---- Healing ----
    pub fn emit_healing_started(&self, event: &HealingStartedEvent) {
        self.emit(|h| h.on_healing_started(event));
    }

    pub fn emit_healing_attempt(&self, event: &HealingAttemptEvent) {
        self.emit(|h| h.on_healing_attempt(event));
    }

    pub fn emit_healing_ended(&self, event: &HealingEndedEvent) {
        self.emit(|h| h.on_healing_ended(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
