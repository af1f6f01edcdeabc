use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::snippet::{Difficulty, Language, Snippet, SnippetLibrary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnippetQuery {
    pub topic: String,
    pub difficulty: Difficulty,
    pub language: Language,
    /// Operation title within the topic, e.g. "Insert at End".
    pub sub_topic: Option<String>,
}

impl SnippetQuery {
    pub fn new(topic: &str, difficulty: Difficulty, language: Language) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty,
            language,
            sub_topic: None,
        }
    }

    pub fn with_sub_topic(mut self, sub_topic: &str) -> Self {
        self.sub_topic = Some(sub_topic.to_string());
        self
    }
}

/// Pick one snippet for the query.
///
/// Filters narrow by topic and language, then by sub-topic and difficulty;
/// each narrowing step is skipped when it would leave nothing. When the
/// topic has no snippets at all in the language, the first snippet of that
/// language (or of the corpus) is returned under a `fallback-` id.
///
/// The returned id is suffixed with `now` in milliseconds so repeated picks
/// of the same snippet stay distinguishable.
pub fn select_snippet<R: Rng + ?Sized>(
    library: &SnippetLibrary,
    query: &SnippetQuery,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Snippet {
    let stamp = now.timestamp_millis();

    let mut candidates: Vec<&Snippet> = library
        .snippets()
        .iter()
        .filter(|s| s.topic == query.topic && s.language == query.language)
        .collect();

    if let Some(sub_topic) = query.sub_topic.as_deref() {
        let narrowed = narrow(&candidates, |s| s.title.as_deref() == Some(sub_topic));
        if narrowed.is_empty() {
            debug!(target: "selector", "no snippet titled {sub_topic:?}, keeping topic-level set");
        } else {
            candidates = narrowed;
        }
    }

    let by_difficulty = narrow(&candidates, |s| s.difficulty == query.difficulty);
    if !by_difficulty.is_empty() {
        candidates = by_difficulty;
    }

    match candidates.choose(rng) {
        Some(&picked) => Snippet {
            id: format!("{}-{stamp}", picked.id),
            ..picked.clone()
        },
        None => {
            warn!(
                target: "selector",
                "no snippets for topic {:?} in {}, returning fallback",
                query.topic, query.language
            );
            let fallback = library
                .snippets()
                .iter()
                .find(|s| s.language == query.language)
                .unwrap_or_else(|| library.first());
            Snippet {
                id: format!("fallback-{stamp}"),
                ..fallback.clone()
            }
        }
    }
}

fn narrow<'a>(set: &[&'a Snippet], keep: impl Fn(&Snippet) -> bool) -> Vec<&'a Snippet> {
    set.iter().copied().filter(|s| keep(*s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn snippet(id: &str, topic: &str, title: &str, difficulty: Difficulty, language: Language) -> Snippet {
        Snippet {
            id: id.to_string(),
            topic: topic.to_string(),
            title: Some(title.to_string()),
            code: format!("// {id}"),
            difficulty,
            language,
            explanations: Vec::new(),
        }
    }

    fn library() -> SnippetLibrary {
        SnippetLibrary::from_snippets(vec![
            snippet("arr-insert", "Array", "Insert", Difficulty::Easy, Language::Cpp),
            snippet("st-push", "Stack", "Push", Difficulty::Easy, Language::Cpp),
            snippet("st-pop", "Stack", "Pop", Difficulty::Easy, Language::Cpp),
            snippet("st-minstack", "Stack", "Min Stack", Difficulty::Hard, Language::Cpp),
            snippet("st-push-j", "Stack", "Push", Difficulty::Easy, Language::Java),
            snippet("q-enqueue-j", "Queue", "Enqueue", Difficulty::Medium, Language::Java),
        ])
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    fn base_id(snippet: &Snippet) -> &str {
        snippet.id.rsplit_once('-').map(|(base, _)| base).unwrap()
    }

    #[test]
    fn test_id_is_suffixed_with_timestamp() {
        let mut rng = SmallRng::seed_from_u64(1);
        let query = SnippetQuery::new("Array", Difficulty::Easy, Language::Cpp);
        let picked = select_snippet(&library(), &query, &mut rng, now());
        assert_eq!(picked.id, "arr-insert-1700000000123");
        assert_eq!(picked.code, "// arr-insert");
    }

    #[test]
    fn test_difficulty_narrows_when_available() {
        let library = library();
        let query = SnippetQuery::new("Stack", Difficulty::Hard, Language::Cpp);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let picked = select_snippet(&library, &query, &mut rng, now());
            assert_eq!(base_id(&picked), "st-minstack");
        }
    }

    #[test]
    fn test_difficulty_relaxed_when_unmatched() {
        let library = library();
        let query = SnippetQuery::new("Stack", Difficulty::Medium, Language::Cpp);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = select_snippet(&library, &query, &mut rng, now());
            assert_eq!(picked.topic, "Stack");
            assert_eq!(picked.language, Language::Cpp);
        }
    }

    #[test]
    fn test_sub_topic_narrows_before_difficulty() {
        let library = library();
        // "Push" only exists as Easy; Hard cannot narrow further so Push wins.
        let query = SnippetQuery::new("Stack", Difficulty::Hard, Language::Cpp).with_sub_topic("Push");
        let mut rng = SmallRng::seed_from_u64(3);
        let picked = select_snippet(&library, &query, &mut rng, now());
        assert_eq!(base_id(&picked), "st-push");
    }

    #[test]
    fn test_unknown_sub_topic_keeps_topic_set() {
        let library = library();
        let query = SnippetQuery::new("Stack", Difficulty::Easy, Language::Cpp)
            .with_sub_topic("Nonexistent Title");
        let mut seen = std::collections::HashSet::new();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let picked = select_snippet(&library, &query, &mut rng, now());
            assert_eq!(picked.topic, "Stack");
            seen.insert(base_id(&picked).to_string());
        }
        assert!(seen.contains("st-push"));
        assert!(seen.contains("st-pop"));
    }

    #[test]
    fn test_missing_topic_falls_back_to_language() {
        let library = library();
        let query = SnippetQuery::new("Trie", Difficulty::Easy, Language::Java);
        let mut rng = SmallRng::seed_from_u64(0);
        let picked = select_snippet(&library, &query, &mut rng, now());
        assert_eq!(picked.id, "fallback-1700000000123");
        assert_eq!(picked.code, "// st-push-j");
        assert_eq!(picked.language, Language::Java);
    }

    #[test]
    fn test_missing_language_falls_back_to_first_snippet() {
        let library = library();
        let query = SnippetQuery::new("Stack", Difficulty::Easy, Language::Python);
        let mut rng = SmallRng::seed_from_u64(0);
        let picked = select_snippet(&library, &query, &mut rng, now());
        assert!(picked.id.starts_with("fallback-"));
        assert_eq!(picked.code, "// arr-insert");
    }
}
