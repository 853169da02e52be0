//! Aggregation of per-journey healing logs into cross-journey totals.

use rustc_hash::FxHashMap;

use crate::session::{HealingSession, SessionLog, SessionStatus};

/// Totals over a set of healing sessions.
#[derive(Debug, Clone, Default)]
pub struct HealingReport {
    pub sessions: usize,
    pub healed: usize,
    pub failed: usize,
    pub exhausted: usize,
    pub in_progress: usize,
    pub total_attempts: usize,
    /// Fix names by descending application count.
    pub top_fixes: Vec<(String, usize)>,
    /// Failure category names by descending occurrence count.
    pub top_failures: Vec<(String, usize)>,
}

impl HealingReport {
    /// Aggregate sessions into totals.
    pub fn aggregate(sessions: &[HealingSession]) -> Self {
        let mut report = Self {
            sessions: sessions.len(),
            ..Default::default()
        };
        let mut fixes: FxHashMap<String, usize> = FxHashMap::default();
        let mut failures: FxHashMap<String, usize> = FxHashMap::default();

        for session in sessions {
            match session.status {
                SessionStatus::Healed => report.healed += 1,
                SessionStatus::Failed => report.failed += 1,
                SessionStatus::Exhausted => report.exhausted += 1,
                SessionStatus::InProgress => report.in_progress += 1,
            }
            report.total_attempts += session.attempts.len();
            for attempt in &session.attempts {
                *fixes.entry(attempt.fix_type.name().to_string()).or_insert(0) += 1;
                *failures
                    .entry(attempt.failure_type.name().to_string())
                    .or_insert(0) += 1;
            }
        }

        report.top_fixes = sorted_desc(fixes);
        report.top_failures = sorted_desc(failures);
        report
    }

    /// Aggregate everything under a log root.
    pub fn from_log(log: &SessionLog) -> Self {
        Self::aggregate(&log.load_all())
    }
}

fn sorted_desc(counts: FxHashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}
