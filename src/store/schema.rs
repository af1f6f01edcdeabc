use serde::{Deserialize, Serialize};

use crate::session::result::Session;

/// Namespace key the session history is stored under.
pub const HISTORY_KEY: &str = "dsarush_history";

/// Sessions kept in history; older ones are evicted first.
pub const MAX_HISTORY: usize = 50;

/// Stored session list, newest first. Serialized as a bare JSON array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory {
    pub sessions: Vec<Session>,
}

impl SessionHistory {
    /// Insert at the head, then drop whatever falls beyond `limit`.
    pub fn push_front(&mut self, session: Session, limit: usize) {
        self.sessions.insert(0, session);
        self.sessions.truncate(limit);
    }

    pub fn stats(&self) -> Option<HistoryStats> {
        if self.sessions.is_empty() {
            return None;
        }
        let total = self.sessions.len();
        let sum: f64 = self.sessions.iter().map(|s| s.wpm).sum();
        let max_wpm = self.sessions.iter().map(|s| s.wpm).fold(f64::MIN, f64::max);
        let max_accuracy = self.sessions.iter().map(|s| s.accuracy).fold(f64::MIN, f64::max);
        Some(HistoryStats {
            avg_wpm: sum / total as f64,
            max_wpm,
            max_accuracy,
            total_sessions: total,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryStats {
    pub avg_wpm: f64,
    pub max_wpm: f64,
    pub max_accuracy: f64,
    pub total_sessions: usize,
}
