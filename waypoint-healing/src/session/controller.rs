//! The healing session controller: a bounded retry state machine.
//!
//! Per attempt: classify the latest failure, ask the rule engine for the
//! next untried fix, apply it, re-run the test, record the outcome, and
//! either stop (healed / failed / exhausted) or loop. On success with
//! learned-pattern provenance the controller records the success back into
//! the learned store.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use waypoint_core::config::{HealingConfig, RunnerConfig};
use waypoint_core::events::{
    EventDispatcher, HealingAttemptEvent, HealingEndedEvent, HealingStartedEvent,
};
use waypoint_core::traits::Cancellable;
use waypoint_mapping::llkb::LlkbStore;

use crate::classify::{FailureCategory, FailureClassifier};
use crate::rules::HealingRuleEngine;
use crate::runner::{RunRequest, TestRunner};

use super::log::SessionLog;
use super::types::{
    AppliedFix, AttemptResult, FixApplier, HealRequest, HealingAttempt, HealingSession,
    SessionStatus,
};

/// Drives healing sessions.
pub struct HealingController {
    classifier: FailureClassifier,
    engine: HealingRuleEngine,
    healing_config: HealingConfig,
    runner_config: RunnerConfig,
    log: Option<SessionLog>,
    events: Option<Arc<EventDispatcher>>,
}

impl HealingController {
    pub fn new(healing_config: HealingConfig, runner_config: RunnerConfig) -> Self {
        Self {
            classifier: FailureClassifier::new(),
            engine: HealingRuleEngine::new(),
            healing_config,
            runner_config,
            log: None,
            events: None,
        }
    }

    pub fn with_engine(mut self, engine: HealingRuleEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_log(mut self, log: SessionLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run one healing session to a terminal state.
    ///
    /// Attempts execute strictly sequentially; the loop suspends only inside
    /// the runner invocation. Cancellation is attempt-boundary only: an
    /// in-flight run always completes (or times out) first.
    pub fn heal(
        &self,
        request: &HealRequest,
        applier: &mut dyn FixApplier,
        runner: &dyn TestRunner,
        mut llkb: Option<&mut LlkbStore>,
        cancel: Option<&dyn Cancellable>,
    ) -> HealingSession {
        let max_attempts = self.healing_config.effective_max_attempts();
        let mut session = HealingSession::start(&request.journey_id, max_attempts, now_unix());
        self.persist(&session);
        self.emit_started(&session);

        let mut failure_message = request.message.clone();
        let mut failure_stack = request.stack.clone();

        loop {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                let status = if session.attempts.is_empty() {
                    SessionStatus::Failed
                } else {
                    SessionStatus::Exhausted
                };
                self.finish(
                    &mut session,
                    status,
                    Some("healing cancelled before the next attempt".to_string()),
                );
                return session;
            }

            let classification =
                self.classifier.classify_error(&failure_message, failure_stack.as_deref());

            let attempted = session.attempted_fixes();
            let Some(fix) =
                self.engine.next_fix(&classification, &attempted, &self.healing_config)
            else {
                // No (further) candidate fix: failed if nothing was ever
                // possible, exhausted otherwise.
                let status = if session.attempts.is_empty() {
                    SessionStatus::Failed
                } else {
                    SessionStatus::Exhausted
                };
                self.finish(
                    &mut session,
                    status,
                    Some(recommend(classification.category)),
                );
                return session;
            };

            let attempt_number = session.attempts.len() as u32 + 1;
            let attempt_started = Instant::now();

            let mut applied: Option<AppliedFix> = None;
            let mut result = AttemptResult::Error;
            let mut evidence;
            let mut file = request.test_file.clone();
            let mut change = String::new();

            match applier.apply(fix, &classification, &request.journey_id) {
                Err(error) => {
                    evidence = format!("fix application failed: {error}");
                }
                Ok(fix_applied) => {
                    file = fix_applied.file.clone();
                    change = fix_applied.change.clone();
                    evidence = fix_applied.evidence.clone();
                    applied = Some(fix_applied);

                    let run_request = RunRequest::from_config(
                        &request.test_file,
                        &self.runner_config,
                        &self.healing_config,
                    );
                    match runner.run(&run_request) {
                        Err(error) => {
                            evidence = format!("{evidence}; runner error: {error}");
                        }
                        Ok(outcome) => {
                            result = if outcome.success {
                                AttemptResult::Pass
                            } else {
                                AttemptResult::Fail
                            };
                            if !outcome.success {
                                failure_message = outcome.failure_text().to_string();
                                failure_stack = None;
                            }
                        }
                    }
                }
            }

            let attempt = HealingAttempt {
                attempt: attempt_number,
                timestamp: now_unix(),
                failure_type: classification.category,
                fix_type: fix,
                file,
                change,
                evidence,
                result,
                duration_ms: attempt_started.elapsed().as_millis() as u64,
            };
            session.append_attempt(attempt);
            self.persist(&session);
            self.emit_attempt(&session, attempt_number, fix.name(), result);

            if result == AttemptResult::Pass {
                // Confirmed repair: write provenance back into the learned
                // store before reporting healed.
                if let (Some(store), Some(applied)) = (llkb.as_deref_mut(), applied.as_ref()) {
                    if let Some(pattern_id) = &applied.llkb_pattern_id {
                        if let Err(error) =
                            store.record_success(pattern_id, &request.journey_id)
                        {
                            tracing::warn!(%error, "learned-store success recording failed");
                        }
                    }
                }
                self.finish(&mut session, SessionStatus::Healed, None);
                return session;
            }

            if session.attempts.len() as u32 >= max_attempts {
                self.finish(
                    &mut session,
                    SessionStatus::Exhausted,
                    Some(recommend(classification.category)),
                );
                return session;
            }
        }
    }

    fn finish(
        &self,
        session: &mut HealingSession,
        status: SessionStatus,
        recommendation: Option<String>,
    ) {
        session.finish(status, recommendation, now_unix());
        self.persist(session);
        if let Some(events) = &self.events {
            events.emit_healing_ended(&HealingEndedEvent {
                journey_id: session.journey_id.clone(),
                status: session.status.name().to_string(),
                attempts: session.attempts.len() as u32,
            });
        }
        tracing::info!(
            journey = %session.journey_id,
            status = session.status.name(),
            attempts = session.attempts.len(),
            "healing session ended"
        );
    }

    /// Incremental persistence; a log write failure is warned about, never
    /// allowed to abort the session.
    fn persist(&self, session: &HealingSession) {
        if let Some(log) = &self.log {
            if let Err(error) = log.write(session) {
                tracing::warn!(%error, "healing log write failed");
            }
        }
    }

    fn emit_started(&self, session: &HealingSession) {
        if let Some(events) = &self.events {
            events.emit_healing_started(&HealingStartedEvent {
                journey_id: session.journey_id.clone(),
                max_attempts: session.max_attempts,
            });
        }
    }

    fn emit_attempt(
        &self,
        session: &HealingSession,
        attempt: u32,
        fix_type: &str,
        result: AttemptResult,
    ) {
        if let Some(events) = &self.events {
            events.emit_healing_attempt(&HealingAttemptEvent {
                journey_id: session.journey_id.clone(),
                attempt,
                fix_type: fix_type.to_string(),
                result: format!("{result:?}").to_lowercase(),
            });
        }
    }
}

/// Category-specific guidance for sessions that end without healing.
pub fn recommend(category: FailureCategory) -> String {
    match category {
        FailureCategory::Selector => "Add a stable test id to the target element".to_string(),
        FailureCategory::Timing => {
            "Investigate a real performance issue; the page may genuinely be slow".to_string()
        }
        FailureCategory::Navigation => "Verify the route and redirect configuration".to_string(),
        FailureCategory::Data => {
            "Align test data with what the application renders".to_string()
        }
        FailureCategory::Auth => {
            "Fix credentials or session setup in the test fixtures".to_string()
        }
        FailureCategory::Env => "Repair the test environment before re-running".to_string(),
        FailureCategory::Script => "Fix the underlying script error".to_string(),
        FailureCategory::Unknown => "Review the failure manually".to_string(),
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
