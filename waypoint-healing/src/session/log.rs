//! Incremental healing-log persistence: one JSON document per journey.

use std::path::{Path, PathBuf};

use waypoint_core::errors::SessionError;

use super::types::HealingSession;

/// Writes and reads per-journey healing session documents under a log root.
pub struct SessionLog {
    root: PathBuf,
}

impl SessionLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, journey_id: &str) -> PathBuf {
        // Journey ids may contain path separators; keep one flat file each.
        let safe: String = journey_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    /// Write the session document, replacing any previous snapshot. Called
    /// after every attempt, not only at the end, so a crash mid-session
    /// leaves an accurate partial record.
    pub fn write(&self, session: &HealingSession) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.root).map_err(|e| SessionError::LogWriteFailed {
            path: self.root.display().to_string(),
            message: e.to_string(),
        })?;
        let path = self.path_for(&session.journey_id);
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::SerializeFailed(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| SessionError::LogWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load one journey's session, if a log exists and parses.
    pub fn load(&self, journey_id: &str) -> Option<HealingSession> {
        let content = std::fs::read_to_string(self.path_for(journey_id)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Load every session under the root, skipping unreadable or corrupt
    /// documents with a warning.
    pub fn load_all(&self) -> Vec<HealingSession> {
        let mut sessions = Vec::new();
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return sessions,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                tracing::warn!(path = %path.display(), "unreadable healing log skipped");
                continue;
            };
            match serde_json::from_str::<HealingSession>(&content) {
                Ok(session) => sessions.push(session),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "corrupt healing log skipped");
                }
            }
        }
        sessions.sort_by(|a, b| a.journey_id.cmp(&b.journey_id));
        sessions
    }
}
