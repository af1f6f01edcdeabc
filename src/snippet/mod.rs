pub mod library;
pub mod selector;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use library::{LibraryError, SnippetLibrary};
pub use selector::{SnippetQuery, select_snippet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty `{s}` (expected easy, medium or hard)"))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    /// Languages the bundled corpus ships snippets for, in menu order.
    pub fn selectable() -> &'static [Language] {
        &[Language::Cpp, Language::Java]
    }

    pub fn next(self) -> Self {
        let options = Self::selectable();
        let idx = options.iter().position(|&l| l == self).unwrap_or(0);
        options[(idx + 1) % options.len()]
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "python" => Ok(Language::Python),
            other => Err(format!("unknown language `{other}` (expected cpp, java or python)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note attached to one line of a snippet. `line` is 1-based.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub line: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub title: Option<String>,
    pub code: String,
    pub difficulty: Difficulty,
    pub language: Language,
    #[serde(default)]
    pub explanations: Vec<Explanation>,
}

impl Snippet {
    /// Title shown to the user; snippets without one are labelled by topic.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.topic)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.code.split('\n')
    }

    pub fn explanation_for(&self, line: usize) -> Option<&str> {
        self.explanations
            .iter()
            .find(|e| e.line == line)
            .map(|e| e.text.as_str())
    }

    pub fn char_count(&self) -> usize {
        self.code.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet() -> Snippet {
        Snippet {
            id: "stack-push".to_string(),
            topic: "Stack".to_string(),
            title: None,
            code: "void push(int x) {\n    st[++top] = x;\n}".to_string(),
            difficulty: Difficulty::Easy,
            language: Language::Cpp,
            explanations: vec![Explanation {
                line: 2,
                text: "Pre-increment top, then store.".to_string(),
            }],
        }
    }

    #[test]
    fn test_display_title_falls_back_to_topic() {
        let mut s = snippet();
        assert_eq!(s.display_title(), "Stack");
        s.title = Some("Stack Array Push".to_string());
        assert_eq!(s.display_title(), "Stack Array Push");
    }

    #[test]
    fn test_explanation_lookup_is_one_based() {
        let s = snippet();
        assert_eq!(s.lines().count(), 3);
        assert!(s.explanation_for(1).is_none());
        assert_eq!(s.explanation_for(2), Some("Pre-increment top, then store."));
    }

    #[test]
    fn test_enums_use_corpus_spelling() {
        let json = serde_json::to_string(&(Difficulty::Medium, Language::Java)).unwrap();
        assert_eq!(json, r#"["Medium","java"]"#);
    }

    #[test]
    fn test_parse_from_cli_spelling() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cpp));
        assert!("rust".parse::<Language>().is_err());
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_language_cycle_skips_unshipped() {
        assert_eq!(Language::Cpp.next(), Language::Java);
        assert_eq!(Language::Java.next(), Language::Cpp);
        assert_eq!(Language::Python.next(), Language::Java);
    }
}
