//! Event handler trait with no-op defaults.

use super::types::*;

/// Receives Waypoint lifecycle events.
///
/// Every method has a no-op default so handlers implement only what
/// they care about.
pub trait WaypointEventHandler: Send + Sync {
    fn on_pattern_learned(&self, _event: &PatternLearnedEvent) {}
    fn on_pattern_reinforced(&self, _event: &PatternReinforcedEvent) {}
    fn on_pattern_weakened(&self, _event: &PatternWeakenedEvent) {}
    fn on_pattern_pruned(&self, _event: &PatternPrunedEvent) {}
    fn on_step_blocked(&self, _event: &StepBlockedEvent) {}
    fn on_healing_started(&self, _event: &HealingStartedEvent) {}
    fn on_healing_attempt(&self, _event: &HealingAttemptEvent) {}
    fn on_healing_ended(&self, _event: &HealingEndedEvent) {}
}
