use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::typing::ScoringConfig;
use crate::snippet::{Difficulty, Language, SnippetLibrary, SnippetQuery};
use crate::store::MAX_HISTORY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    Typing,
    Reorder,
}

impl FromStr for PracticeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typing" => Ok(PracticeMode::Typing),
            "reorder" => Ok(PracticeMode::Reorder),
            other => Err(format!("unknown mode `{other}` (expected typing or reorder)")),
        }
    }
}

impl PracticeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::Typing => "typing",
            PracticeMode::Reorder => "reorder",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            PracticeMode::Typing => PracticeMode::Reorder,
            PracticeMode::Reorder => PracticeMode::Typing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_topic: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default = "default_mode")]
    pub mode: PracticeMode,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_hesitation_ms")]
    pub hesitation_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_sound")]
    pub sound: bool,
}

fn default_topic() -> String {
    "Linked List".to_string()
}
fn default_difficulty() -> Difficulty {
    Difficulty::Easy
}
fn default_language() -> Language {
    Language::Cpp
}
fn default_mode() -> PracticeMode {
    PracticeMode::Typing
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_hesitation_ms() -> u64 {
    2000
}
fn default_history_limit() -> usize {
    MAX_HISTORY
}
fn default_sound() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            sub_topic: None,
            difficulty: default_difficulty(),
            language: default_language(),
            mode: default_mode(),
            theme: default_theme(),
            hesitation_ms: default_hesitation_ms(),
            history_limit: default_history_limit(),
            sound: default_sound(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dsarush")
            .join("config.toml")
    }

    /// Reset values the corpus cannot serve and clamp numeric ranges. Call
    /// after deserialization; stale configs may name removed topics.
    pub fn normalize(&mut self, library: &SnippetLibrary) {
        if !library.has_topic(&self.topic) {
            self.topic = if library.has_topic(&default_topic()) {
                default_topic()
            } else {
                library.first().topic.clone()
            };
        }
        if let Some(sub) = &self.sub_topic {
            let ops = library.operations_for_topic(&self.topic, self.language);
            if !ops.contains(&sub.as_str()) {
                self.sub_topic = None;
            }
        }
        self.hesitation_ms = self.hesitation_ms.clamp(250, 10_000);
        self.history_limit = self.history_limit.clamp(1, MAX_HISTORY);
    }

    pub fn query(&self) -> SnippetQuery {
        SnippetQuery {
            topic: self.topic.clone(),
            difficulty: self.difficulty,
            language: self.language,
            sub_topic: self.sub_topic.clone(),
        }
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            hesitation: Duration::from_millis(self.hesitation_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.topic, "Linked List");
        assert_eq!(config.hesitation_ms, 2000);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
topic = "Stack"
difficulty = "Hard"
language = "java"
mode = "reorder"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.topic, "Stack");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.language, Language::Java);
        assert_eq!(config.mode, PracticeMode::Reorder);
        assert!(config.sound);
        assert!(config.sub_topic.is_none());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.sub_topic = Some("Insert at End".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_normalize_resets_unknown_topic_and_sub_topic() {
        let library = SnippetLibrary::load().unwrap();
        let mut config = Config::default();
        config.topic = "Red Black Tree".to_string();
        config.sub_topic = Some("Rotate Left".to_string());
        config.normalize(&library);
        assert_eq!(config.topic, "Linked List");
        assert!(config.sub_topic.is_none());
    }

    #[test]
    fn test_normalize_keeps_valid_sub_topic() {
        let library = SnippetLibrary::load().unwrap();
        let mut config = Config::default();
        config.topic = "Stack".to_string();
        config.sub_topic = Some("Stack Array Push".to_string());
        config.normalize(&library);
        assert_eq!(config.sub_topic.as_deref(), Some("Stack Array Push"));
    }

    #[test]
    fn test_normalize_clamps_ranges() {
        let library = SnippetLibrary::load().unwrap();
        let mut config = Config::default();
        config.hesitation_ms = 0;
        config.history_limit = 500;
        config.normalize(&library);
        assert_eq!(config.hesitation_ms, 250);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Reorder".parse::<PracticeMode>(), Ok(PracticeMode::Reorder));
        assert!("drag".parse::<PracticeMode>().is_err());
    }

    #[test]
    fn test_scoring_uses_hesitation() {
        let mut config = Config::default();
        config.hesitation_ms = 1500;
        assert_eq!(config.scoring().hesitation, Duration::from_millis(1500));
    }
}
