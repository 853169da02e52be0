//! Healing session records.
//!
//! The session controller is the sole owner and writer of these records.
//! Attempts are appended in strict attempt-number order and never mutated
//! after being written, giving callers a reliable audit trail.

use serde::{Deserialize, Serialize};

use crate::classify::{FailureCategory, FailureClassification};
use crate::rules::FixType;

/// Session lifecycle: `InProgress` transitions to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Healed,
    Failed,
    Exhausted,
}

impl SessionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Healed => "healed",
            Self::Failed => "failed",
            Self::Exhausted => "exhausted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != Self::InProgress
    }
}

/// Result of one applied fix and re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptResult {
    Pass,
    Fail,
    Error,
}

/// One repair attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    pub timestamp: u64,
    pub failure_type: FailureCategory,
    pub fix_type: FixType,
    pub file: String,
    pub change: String,
    pub evidence: String,
    pub result: AttemptResult,
    pub duration_ms: u64,
}

/// One journey's healing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealingSession {
    pub journey_id: String,
    pub started_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<u64>,
    pub max_attempts: u32,
    pub status: SessionStatus,
    pub attempts: Vec<HealingAttempt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl HealingSession {
    pub fn start(journey_id: impl Into<String>, max_attempts: u32, started_at: u64) -> Self {
        Self {
            journey_id: journey_id.into(),
            started_at,
            ended_at: None,
            max_attempts,
            status: SessionStatus::InProgress,
            attempts: Vec::new(),
            recommendation: None,
        }
    }

    /// Append the next attempt. Out-of-order appends are programmer errors.
    pub fn append_attempt(&mut self, attempt: HealingAttempt) {
        assert_eq!(
            attempt.attempt,
            self.attempts.len() as u32 + 1,
            "attempts must be appended in order"
        );
        assert!(
            !self.status.is_terminal(),
            "cannot append to a terminal session"
        );
        self.attempts.push(attempt);
    }

    /// Transition to a terminal state.
    pub fn finish(
        &mut self,
        status: SessionStatus,
        recommendation: Option<String>,
        ended_at: u64,
    ) {
        assert!(status.is_terminal(), "finish requires a terminal status");
        self.status = status;
        self.recommendation = recommendation;
        self.ended_at = Some(ended_at);
    }

    pub fn attempted_fixes(&self) -> Vec<FixType> {
        self.attempts.iter().map(|a| a.fix_type).collect()
    }
}

/// The failing-run description a healing session starts from.
#[derive(Debug, Clone)]
pub struct HealRequest {
    pub journey_id: String,
    pub test_file: String,
    pub message: String,
    pub stack: Option<String>,
}

/// What a fix application changed, for the audit trail and for learned-store
/// provenance.
#[derive(Debug, Clone)]
pub struct AppliedFix {
    pub file: String,
    pub change: String,
    pub evidence: String,
    /// Set when the fix substituted a learned pattern; on a healed session
    /// the controller records a success against this id.
    pub llkb_pattern_id: Option<String>,
}

/// Applies a fix to the generated test source.
///
/// Mutating test source is inherently project-specific; the controller
/// drives this through a trait so the state machine stays testable.
pub trait FixApplier {
    fn apply(
        &mut self,
        fix: FixType,
        classification: &FailureClassification,
        journey_id: &str,
    ) -> Result<AppliedFix, waypoint_core::errors::SessionError>;
}
