use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::snippet::{Language, Snippet};

const SESSION_ID_LEN: usize = 7;
const SESSION_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Final numbers for one completed attempt. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStats {
    pub wpm: f64,
    pub accuracy: f64,
    /// Whole seconds.
    pub time_elapsed: u64,
    pub errors: u32,
    pub total_chars: usize,
    pub max_combo: u32,
}

impl TestStats {
    /// Words per minute for `chars` characters typed in `secs` seconds, with a
    /// word counted as five characters.
    pub fn wpm_for(chars: usize, secs: f64) -> f64 {
        if secs <= 0.0 {
            return 0.0;
        }
        (chars as f64 / 5.0) / (secs / 60.0)
    }

    pub fn share_text(&self, snippet: &Snippet) -> String {
        format!(
            "DSArush \u{26a1}\n{}: {}\n\nWPM: {}\nAcc: {}%\nMax Combo: {} \u{26a1}\n\n#DSArush #DSA #Coding",
            snippet.topic,
            snippet.title.as_deref().unwrap_or("Practice"),
            self.wpm.round(),
            self.accuracy.round(),
            self.max_combo,
        )
    }
}

/// History record of one completed attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub snippet_id: String,
    pub topic: String,
    pub title: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub language: Language,
}

impl Session {
    pub fn from_stats<R: Rng + ?Sized>(
        stats: &TestStats,
        snippet: &Snippet,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Self {
        // Stored with millisecond precision; truncate so a reload compares equal.
        let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        Self {
            id: session_id(rng),
            timestamp,
            snippet_id: snippet.id.clone(),
            topic: snippet.topic.clone(),
            title: snippet.display_title().to_string(),
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            max_combo: stats.max_combo,
            language: snippet.language,
        }
    }
}

fn session_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SESSION_ID_LEN)
        .map(|_| SESSION_ID_ALPHABET[rng.gen_range(0..SESSION_ID_ALPHABET.len())] as char)
        .collect()
}
