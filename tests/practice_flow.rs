use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use dsarush::highlight::{SyntaxClass, syntax_lines, syntax_map};
use dsarush::session::input::strokes_for;
use dsarush::session::{Phase, ReorderSession, ScoringConfig, Session, TypingSession};
use dsarush::snippet::{Difficulty, Language, SnippetLibrary, SnippetQuery, select_snippet};
use dsarush::store::{JsonStore, MAX_HISTORY};

fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
}

fn base_id(id: &str) -> &str {
    id.strip_suffix("-1700000000123").unwrap_or(id)
}

#[test]
fn unknown_sub_topic_keeps_whole_topic() {
    let library = SnippetLibrary::load().unwrap();
    let query = SnippetQuery::new("Stack", Difficulty::Easy, Language::Cpp)
        .with_sub_topic("Nonexistent Title");

    let mut picked = BTreeSet::new();
    for seed in 0..300 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let snippet = select_snippet(&library, &query, &mut rng, fixed_now());
        assert_eq!(snippet.topic, "Stack");
        assert_eq!(snippet.language, Language::Cpp);
        assert!(!snippet.id.starts_with("fallback-"));
        picked.insert(base_id(&snippet.id).to_string());
    }

    let expected: BTreeSet<String> = library
        .snippets()
        .iter()
        .filter(|s| s.topic == "Stack" && s.language == Language::Cpp)
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(picked, expected);
}

#[test]
fn unknown_topic_falls_back_to_language() {
    let library = SnippetLibrary::load().unwrap();
    let query = SnippetQuery::new("Splay Tree", Difficulty::Hard, Language::Java);
    let mut rng = SmallRng::seed_from_u64(1);
    let snippet = select_snippet(&library, &query, &mut rng, fixed_now());
    assert_eq!(snippet.id, "fallback-1700000000123");
    assert_eq!(snippet.language, Language::Java);
}

#[test]
fn typed_snippet_lands_in_history() {
    let library = SnippetLibrary::load().unwrap();
    let query = SnippetQuery::new("Linked List", Difficulty::Medium, Language::Java);
    let mut rng = SmallRng::seed_from_u64(42);
    let snippet = select_snippet(&library, &query, &mut rng, fixed_now());
    assert_eq!(snippet.difficulty, Difficulty::Medium);

    let mut session = TypingSession::new(&snippet.code, ScoringConfig::default());
    let t0 = Instant::now();
    let mut stats = None;
    for (i, key) in strokes_for(&snippet.code).into_iter().enumerate() {
        let transition = session.process(key, t0 + Duration::from_millis(120 * i as u64));
        if transition.stats.is_some() {
            assert!(stats.is_none(), "completion reported twice");
            stats = transition.stats;
        }
    }
    assert_eq!(session.phase(), Phase::Complete);
    let stats = stats.expect("session completed");
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.accuracy, 100.0);
    assert_eq!(stats.total_chars, snippet.char_count());
    assert!(stats.wpm > 0.0);

    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let record = Session::from_stats(&stats, &snippet, &mut rng, fixed_now());
    let saved = store.save_session(record.clone()).unwrap();
    assert_eq!(saved, vec![record.clone()]);

    let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.load_history(), vec![record]);
    let summary = reopened.history_stats().unwrap();
    assert_eq!(summary.total_sessions, 1);
    assert_eq!(summary.max_wpm, stats.wpm);
}

#[test]
fn full_history_evicts_oldest() {
    let library = SnippetLibrary::load().unwrap();
    let snippet = library.first().clone();
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut rng = SmallRng::seed_from_u64(3);

    let stats = dsarush::session::TestStats {
        wpm: 40.0,
        accuracy: 98.0,
        time_elapsed: 30,
        errors: 1,
        total_chars: snippet.char_count(),
        max_combo: 20,
    };
    let mut first_id = String::new();
    for i in 0..MAX_HISTORY {
        let now = fixed_now() + chrono::Duration::seconds(i as i64);
        let record = Session::from_stats(&stats, &snippet, &mut rng, now);
        if i == 0 {
            first_id = record.id.clone();
        }
        store.save_session(record).unwrap();
    }
    assert_eq!(store.load_history().len(), MAX_HISTORY);

    let newest = Session::from_stats(&stats, &snippet, &mut rng, fixed_now() + chrono::Duration::hours(1));
    let history = store.save_session(newest.clone()).unwrap();
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history[0], newest);
    assert!(history.iter().all(|s| s.id != first_id));
}

#[test]
fn reorder_session_solves_real_snippet() {
    let library = SnippetLibrary::load().unwrap();
    let snippet = library
        .snippets()
        .iter()
        .find(|s| s.lines().count() > 3)
        .unwrap();
    let original: Vec<&str> = snippet.lines().collect();
    let mut rng = SmallRng::seed_from_u64(11);
    let t0 = Instant::now();
    let mut reorder = ReorderSession::new(&snippet.code, &mut rng, t0);
    assert!(!reorder.is_complete());

    let mut stats = None;
    for slot in 0..original.len() {
        if reorder.is_line_correct(slot) {
            continue;
        }
        let from = (slot..original.len())
            .find(|&i| reorder.items()[i].content == original[slot])
            .unwrap();
        let transition = reorder.move_line(from, slot, t0 + Duration::from_secs(slot as u64 + 1));
        if transition.stats.is_some() {
            stats = transition.stats;
        }
    }

    assert!(reorder.is_complete());
    let stats = stats.expect("final move reports stats");
    assert_eq!(stats.accuracy, 100.0);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.max_combo, original.len() as u32);
    assert_eq!(stats.total_chars, reorder.total_chars());
}

#[test]
fn highlight_covers_every_corpus_char() {
    let library = SnippetLibrary::load().unwrap();
    for snippet in library.snippets() {
        let map = syntax_map(&snippet.code);
        assert_eq!(map.len(), snippet.char_count(), "{}", snippet.id);

        let lines = syntax_lines(&snippet.code);
        assert_eq!(lines.len(), snippet.lines().count(), "{}", snippet.id);
    }

    let push = library
        .snippets()
        .iter()
        .find(|s| s.id == "stack-array-push")
        .unwrap();
    assert!(syntax_map(&push.code).contains(&SyntaxClass::Keyword));
}
