//! Event payload types.

/// Payload for `on_pattern_learned`.
#[derive(Debug, Clone)]
pub struct PatternLearnedEvent {
    pub pattern_id: String,
    pub normalized_text: String,
    pub confidence: f64,
}

/// Payload for `on_pattern_reinforced`.
#[derive(Debug, Clone)]
pub struct PatternReinforcedEvent {
    pub pattern_id: String,
    pub confidence: f64,
}

/// Payload for `on_pattern_weakened`.
#[derive(Debug, Clone)]
pub struct PatternWeakenedEvent {
    pub pattern_id: String,
    pub confidence: f64,
}

/// Payload for `on_pattern_pruned`.
#[derive(Debug, Clone)]
pub struct PatternPrunedEvent {
    pub pattern_id: String,
    pub confidence: f64,
    pub applications: u64,
}

/// Payload for `on_step_blocked`.
#[derive(Debug, Clone)]
pub struct StepBlockedEvent {
    pub source_text: String,
    pub reason: String,
}

/// Payload for `on_healing_started`.
#[derive(Debug, Clone)]
pub struct HealingStartedEvent {
    pub journey_id: String,
    pub max_attempts: u32,
}

/// Payload for `on_healing_attempt`.
#[derive(Debug, Clone)]
pub struct HealingAttemptEvent {
    pub journey_id: String,
    pub attempt: u32,
    pub fix_type: String,
    pub result: String,
}

/// Payload for `on_healing_ended`.
#[derive(Debug, Clone)]
pub struct HealingEndedEvent {
    pub journey_id: String,
    pub status: String,
    pub attempts: u32,
}
