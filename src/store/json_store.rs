use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::result::Session;
use crate::store::schema::{HISTORY_KEY, HistoryStats, MAX_HISTORY, SessionHistory};

/// Key-value store of JSON documents, one file per key.
pub struct JsonStore {
    base_dir: PathBuf,
    history_limit: usize,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dsarush");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            history_limit: MAX_HISTORY,
        })
    }

    /// Keep fewer than the default number of sessions. Clamped to `1..=50`.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.clamp(1, MAX_HISTORY);
        self
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Missing, unreadable or unparseable documents all load as the default.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.file_path(key);
        if !path.exists() {
            return T::default();
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(target: "history", "failed to read {}: {e}", path.display());
                return T::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(target: "history", "failed to parse {}: {e}", path.display());
            T::default()
        })
    }

    fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Newest first.
    pub fn load_history(&self) -> Vec<Session> {
        self.load::<SessionHistory>(HISTORY_KEY).sessions
    }

    /// Record a session at the head of the history and return the new list.
    pub fn save_session(&self, session: Session) -> Result<Vec<Session>> {
        let mut history: SessionHistory = self.load(HISTORY_KEY);
        history.push_front(session, self.history_limit);
        self.save(HISTORY_KEY, &history)?;
        Ok(history.sessions)
    }

    pub fn clear_history(&self) -> Result<()> {
        let path = self.file_path(HISTORY_KEY);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(target: "history", "history cleared");
        }
        Ok(())
    }

    pub fn history_stats(&self) -> Option<HistoryStats> {
        self.load::<SessionHistory>(HISTORY_KEY).stats()
    }
}
