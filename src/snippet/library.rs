use std::collections::HashSet;

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::snippet::{Language, Snippet};

#[derive(Embed)]
#[folder = "assets/corpus/"]
struct CorpusAssets;

const CORPUS_FILE: &str = "snippets.json";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("bundled snippet corpus `{0}` is missing")]
    MissingAsset(&'static str),
    #[error("snippet corpus is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("snippet corpus is empty")]
    Empty,
}

#[derive(Deserialize)]
struct CorpusFile {
    topics: Vec<String>,
    snippets: Vec<Snippet>,
}

/// Read-only snippet corpus. Construction guarantees at least one snippet.
#[derive(Clone, Debug)]
pub struct SnippetLibrary {
    topics: Vec<String>,
    snippets: Vec<Snippet>,
}

impl SnippetLibrary {
    pub fn load() -> Result<Self, LibraryError> {
        let file = CorpusAssets::get(CORPUS_FILE).ok_or(LibraryError::MissingAsset(CORPUS_FILE))?;
        Self::from_json(file.data.as_ref())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, LibraryError> {
        let corpus: CorpusFile = serde_json::from_slice(bytes)?;
        let mut library = Self::from_snippets(corpus.snippets)?;
        if !corpus.topics.is_empty() {
            library.topics = corpus.topics;
        }
        Ok(library)
    }

    /// Build a library from an explicit list. Topics are listed in order of
    /// first appearance.
    pub fn from_snippets(snippets: Vec<Snippet>) -> Result<Self, LibraryError> {
        if snippets.is_empty() {
            return Err(LibraryError::Empty);
        }
        let mut seen = HashSet::new();
        let topics = snippets
            .iter()
            .filter(|s| seen.insert(s.topic.as_str()))
            .map(|s| s.topic.clone())
            .collect();
        Ok(Self { topics, snippets })
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Non-empty by construction.
    pub fn first(&self) -> &Snippet {
        &self.snippets[0]
    }

    /// Distinct titles for a topic/language pair, in corpus order.
    pub fn operations_for_topic(&self, topic: &str, language: Language) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.snippets
            .iter()
            .filter(|s| s.topic == topic && s.language == language)
            .filter_map(|s| s.title.as_deref())
            .filter(|title| seen.insert(*title))
            .collect()
    }
}
