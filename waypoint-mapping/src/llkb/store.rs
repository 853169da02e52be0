//! The learned pattern store: load/save lifecycle, exact-match lookup, and
//! the success/failure learning loop.
//!
//! The store is the single owner of `LearnedPattern` records and the only
//! writer of confidence. Persistence is one JSON document per store root,
//! read-modify-written under a load-mutate-save discipline; concurrent
//! writers against the same path require external serialization.

use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHasher;

use waypoint_core::errors::StoreError;
use waypoint_core::events::{
    EventDispatcher, PatternLearnedEvent, PatternPrunedEvent, PatternReinforcedEvent,
    PatternWeakenedEvent,
};

use super::types::{
    LearnedPattern, LlkbDiagnostics, StoreDocument, CONFIDENCE_CAP, CONFIDENCE_FLOOR,
    FAILURE_DELTA, INITIAL_CONFIDENCE, STORE_FILE, STORE_VERSION, SUCCESS_DELTA,
};
use crate::ir::Primitive;

/// An owned learned-pattern store with explicit load/save/reset lifecycle.
pub struct LlkbStore {
    path: Option<PathBuf>,
    patterns: Vec<LearnedPattern>,
    events: Option<Arc<EventDispatcher>>,
}

impl LlkbStore {
    /// An in-memory store with no backing file. `save` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            patterns: Vec::new(),
            events: None,
        }
    }

    /// Load the store from `root/llkb.json`.
    ///
    /// An absent or corrupt file yields an empty store with a logged warning,
    /// never an error: losing learned patterns is recoverable, crashing the
    /// pipeline is not.
    pub fn load(root: &Path) -> Self {
        let path = root.join(STORE_FILE);
        let patterns = match std::fs::read_to_string(&path) {
            Err(_) => Vec::new(),
            Ok(content) => match serde_json::from_str::<StoreDocument>(&content) {
                Ok(doc) if doc.version == STORE_VERSION => doc.patterns,
                Ok(doc) => {
                    tracing::warn!(
                        path = %path.display(),
                        version = doc.version,
                        "unsupported store version; starting with an empty store"
                    );
                    Vec::new()
                }
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "corrupt learned pattern store; starting with an empty store"
                    );
                    Vec::new()
                }
            },
        };
        Self {
            path: Some(path),
            patterns,
            events: None,
        }
    }

    /// Attach an event dispatcher for pattern lifecycle events.
    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Persist the store to its backing file, if any.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        let doc = StoreDocument {
            version: STORE_VERSION,
            patterns: self.patterns.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| StoreError::SerializeFailed(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| StoreError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Drop all learned patterns.
    pub fn reset(&mut self) {
        self.patterns.clear();
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LearnedPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// Exact-match lookup on normalized text at or above `min_confidence`.
    /// Ties are impossible: `normalized_text` is a unique key.
    pub fn match_pattern(
        &self,
        normalized_text: &str,
        min_confidence: f64,
    ) -> Option<&LearnedPattern> {
        self.patterns
            .iter()
            .find(|p| p.normalized_text == normalized_text && p.confidence >= min_confidence)
    }

    /// Record a new mapping, or reinforce the existing entry for the same
    /// normalized text. Creation requires provenance: `journey_id` names the
    /// journey whose passing test confirmed the mapping. Returns the entry id.
    pub fn learn(
        &mut self,
        normalized_text: &str,
        primitive: Primitive,
        journey_id: &str,
    ) -> String {
        if let Some(existing) = self
            .patterns
            .iter()
            .position(|p| p.normalized_text == normalized_text)
        {
            let id = self.patterns[existing].id.clone();
            // Unique-key invariant: reinforce rather than duplicate.
            let _ = self.record_success(&id, journey_id);
            return id;
        }

        let now = now_unix();
        let id = pattern_id(normalized_text);
        let mut source_journeys = std::collections::BTreeSet::new();
        source_journeys.insert(journey_id.to_string());
        let pattern = LearnedPattern {
            id: id.clone(),
            normalized_text: normalized_text.to_string(),
            primitive,
            confidence: INITIAL_CONFIDENCE,
            success_count: 1,
            fail_count: 0,
            source_journeys,
            created_at: now,
            last_used_at: now,
            last_success_at: Some(now),
        };
        if let Some(events) = &self.events {
            events.emit_pattern_learned(&PatternLearnedEvent {
                pattern_id: pattern.id.clone(),
                normalized_text: pattern.normalized_text.clone(),
                confidence: pattern.confidence,
            });
        }
        self.patterns.push(pattern);
        id
    }

    /// Record a confirmed success: the generated test using this pattern
    /// passed. Adjusts confidence by +0.05, capped at 0.95, and adds the
    /// journey to the pattern's provenance set.
    pub fn record_success(&mut self, id: &str, journey_id: &str) -> Result<(), StoreError> {
        let events = self.events.clone();
        let pattern = self.get_mut(id)?;
        let now = now_unix();
        pattern.success_count += 1;
        pattern.confidence = (pattern.confidence + SUCCESS_DELTA).min(CONFIDENCE_CAP);
        pattern.last_used_at = now;
        pattern.last_success_at = Some(now);
        pattern.source_journeys.insert(journey_id.to_string());
        if let Some(events) = events {
            events.emit_pattern_reinforced(&PatternReinforcedEvent {
                pattern_id: id.to_string(),
                confidence: pattern.confidence,
            });
        }
        Ok(())
    }

    /// Record a failure: a test using this pattern failed for a reason
    /// attributed to the mapping. Adjusts confidence by -0.10, floored at 0.10.
    pub fn record_failure(&mut self, id: &str) -> Result<(), StoreError> {
        let events = self.events.clone();
        let pattern = self.get_mut(id)?;
        pattern.fail_count += 1;
        pattern.confidence = (pattern.confidence - FAILURE_DELTA).max(CONFIDENCE_FLOOR);
        pattern.last_used_at = now_unix();
        if let Some(events) = events {
            events.emit_pattern_weakened(&PatternWeakenedEvent {
                pattern_id: id.to_string(),
                confidence: pattern.confidence,
            });
        }
        Ok(())
    }

    /// Remove entries that have had a fair chance and still sit below the
    /// confidence bar. Entries with fewer than `min_applications` recorded
    /// applications are always retained (cold patterns get a grace period).
    /// Returns the number of entries removed.
    pub fn prune(&mut self, min_confidence: f64, min_applications: u32) -> usize {
        let before = self.patterns.len();
        let events = self.events.clone();
        let min_applications = u64::from(min_applications);
        self.patterns.retain(|p| {
            let prunable = p.applications() >= min_applications && p.confidence < min_confidence;
            if prunable {
                if let Some(events) = &events {
                    events.emit_pattern_pruned(&PatternPrunedEvent {
                        pattern_id: p.id.clone(),
                        confidence: p.confidence,
                        applications: p.applications(),
                    });
                }
            }
            !prunable
        });
        before - self.patterns.len()
    }

    /// Read-only export of the top-N highest-confidence entries at or above
    /// the publish threshold, for external consumers.
    pub fn export_top(&self, n: usize, publish_threshold: f64) -> Vec<&LearnedPattern> {
        let mut publishable: Vec<&LearnedPattern> = self
            .patterns
            .iter()
            .filter(|p| p.confidence >= publish_threshold)
            .collect();
        publishable.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.normalized_text.cmp(&b.normalized_text))
        });
        publishable.truncate(n);
        publishable
    }

    pub fn diagnostics(&self, publish_threshold: f64) -> LlkbDiagnostics {
        LlkbDiagnostics::from_patterns(&self.patterns, publish_threshold)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut LearnedPattern, StoreError> {
        self.patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::PatternNotFound { id: id.to_string() })
    }
}

/// Deterministic id derived from the normalized text.
fn pattern_id(normalized_text: &str) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(normalized_text.as_bytes());
    format!("lp-{:016x}", hasher.finish())
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
