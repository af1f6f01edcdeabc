use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::feedback::Cue;
use crate::session::result::TestStats;

/// How long a misplaced line stays flagged.
pub const ERROR_FLASH: Duration = Duration::from_millis(800);
const SHUFFLE_ATTEMPTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    /// Index of the line in the original snippet.
    pub id: usize,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReorderTransition {
    pub cues: Vec<Cue>,
    pub stats: Option<TestStats>,
}

/// Line-ordering puzzle: the snippet's lines are shuffled and the user moves
/// them until the order matches the original.
pub struct ReorderSession {
    original: Vec<String>,
    items: Vec<LineItem>,
    interacted: HashSet<usize>,
    error: Option<(usize, Instant)>,
    started_at: Instant,
    finished: bool,
}

impl ReorderSession {
    pub fn new<R: Rng + ?Sized>(code: &str, rng: &mut R, now: Instant) -> Self {
        let original: Vec<String> = code.split('\n').map(str::to_string).collect();
        let mut items: Vec<LineItem> = original
            .iter()
            .enumerate()
            .map(|(id, content)| LineItem {
                id,
                content: content.clone(),
            })
            .collect();

        // Lines with identical content can make every arrangement solved.
        let distinct: HashSet<&str> = original.iter().map(String::as_str).collect();
        if distinct.len() > 1 {
            for _ in 0..SHUFFLE_ATTEMPTS {
                items.shuffle(rng);
                if !is_ordered(&items, &original) {
                    break;
                }
            }
            // A one-step rotation of non-uniform lines is never solved.
            if is_ordered(&items, &original) {
                items.rotate_left(1);
            }
        }

        Self {
            original,
            items,
            interacted: HashSet::new(),
            error: None,
            started_at: now,
            finished: false,
        }
    }

    /// Move the line at `from` so it ends up at `to`, shifting the lines in
    /// between.
    pub fn move_line(&mut self, from: usize, to: usize, now: Instant) -> ReorderTransition {
        let len = self.items.len();
        if self.finished || from == to || from >= len || to >= len {
            return ReorderTransition {
                cues: vec![Cue::Drop],
                stats: None,
            };
        }

        let moved_id = self.items[from].id;
        let displaced_id = self.items[to].id;
        let item = self.items.remove(from);
        self.items.insert(to, item);

        self.interacted.insert(moved_id);
        self.interacted.insert(displaced_id);

        let mut cues = Vec::new();
        if self.is_line_correct(to) {
            cues.push(Cue::PlaceCorrect);
        } else {
            self.error = Some((moved_id, now));
            cues.push(Cue::Error);
        }

        let mut stats = None;
        if is_ordered(&self.items, &self.original) {
            self.finished = true;
            cues.push(Cue::Combo);
            stats = Some(self.final_stats(now));
        }
        ReorderTransition { cues, stats }
    }

    fn final_stats(&self, now: Instant) -> TestStats {
        let secs = now.saturating_duration_since(self.started_at).as_secs_f64();
        let chars = self.total_chars();
        TestStats {
            wpm: TestStats::wpm_for(chars, secs),
            accuracy: 100.0,
            time_elapsed: secs.round() as u64,
            errors: 0,
            total_chars: chars,
            max_combo: self.items.len() as u32,
        }
    }

    /// Characters across all lines, newlines excluded.
    pub fn total_chars(&self) -> usize {
        self.original.iter().map(|l| l.chars().count()).sum()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_line_correct(&self, idx: usize) -> bool {
        match (self.items.get(idx), self.original.get(idx)) {
            (Some(item), Some(line)) => item.content == *line,
            _ => false,
        }
    }

    pub fn is_interacted(&self, id: usize) -> bool {
        self.interacted.contains(&id)
    }

    /// The line currently flagged as misplaced, if its flash has not expired.
    pub fn error_line(&self, now: Instant) -> Option<usize> {
        self.error
            .filter(|&(_, at)| now.saturating_duration_since(at) < ERROR_FLASH)
            .map(|(id, _)| id)
    }

    pub fn is_complete(&self) -> bool {
        self.finished
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

fn is_ordered(items: &[LineItem], original: &[String]) -> bool {
    items.len() == original.len() && items.iter().zip(original).all(|(item, line)| item.content == *line)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const CODE: &str = "int a = 1;\nint b = 2;\nint c = a + b;\nreturn c;";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Solve by repeatedly moving the line that belongs at each slot.
    fn solve(session: &mut ReorderSession, t0: Instant) -> Vec<ReorderTransition> {
        let mut transitions = Vec::new();
        for slot in 0..session.items().len() {
            let from = session.items().iter().position(|i| i.id == slot).unwrap();
            if from != slot {
                transitions.push(session.move_line(from, slot, t0 + ms(1000 * (slot as u64 + 1))));
            }
        }
        transitions
    }

    #[test]
    fn test_new_session_shuffles_every_line() {
        let mut rng = SmallRng::seed_from_u64(42);
        let session = ReorderSession::new(CODE, &mut rng, Instant::now());
        assert_eq!(session.items().len(), 4);
        let mut ids: Vec<usize> = session.items().iter().map(|i| i.id).collect();
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(!is_ordered(session.items(), &session.original));
    }

    #[test]
    fn test_solving_completes_once_with_fixed_stats() {
        let mut rng = SmallRng::seed_from_u64(9);
        let t0 = Instant::now();
        let mut session = ReorderSession::new(CODE, &mut rng, t0);
        let transitions = solve(&mut session, t0);

        assert!(session.is_complete());
        let finals: Vec<&TestStats> = transitions.iter().filter_map(|t| t.stats.as_ref()).collect();
        assert_eq!(finals.len(), 1);
        let stats = finals[0];
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.max_combo, 4);
        assert_eq!(stats.total_chars, CODE.len() - 3);
        assert!(transitions.last().unwrap().cues.contains(&Cue::Combo));

        let after = session.move_line(0, 1, t0 + ms(60_000));
        assert!(after.stats.is_none());
    }

    #[test]
    fn test_misplaced_move_flags_error_briefly() {
        let mut rng = SmallRng::seed_from_u64(1);
        let t0 = Instant::now();
        let mut session = ReorderSession::new(CODE, &mut rng, t0);

        // Find a move that lands a line in the wrong slot.
        let (from, to) = (0..4)
            .flat_map(|f| (0..4).map(move |t| (f, t)))
            .find(|&(f, t)| f != t && session.items()[f].id != t)
            .unwrap();
        let moved_id = session.items()[from].id;
        let displaced_id = session.items()[to].id;
        let out = session.move_line(from, to, t0);

        assert!(out.cues.contains(&Cue::Error));
        assert_eq!(session.error_line(t0 + ms(100)), Some(moved_id));
        assert_eq!(session.error_line(t0 + ERROR_FLASH), None);
        assert!(session.is_interacted(moved_id));
        assert!(session.is_interacted(displaced_id));
    }

    #[test]
    fn test_correct_placement_cue() {
        let mut rng = SmallRng::seed_from_u64(5);
        let t0 = Instant::now();
        let mut session = ReorderSession::new(CODE, &mut rng, t0);
        let from = session.items().iter().position(|i| i.id == 0).unwrap();
        if from == 0 {
            return;
        }
        let out = session.move_line(from, 0, t0);
        assert!(out.cues.contains(&Cue::PlaceCorrect));
        assert!(session.is_line_correct(0));
    }

    #[test]
    fn test_noop_moves_only_drop() {
        let mut rng = SmallRng::seed_from_u64(2);
        let t0 = Instant::now();
        let mut session = ReorderSession::new(CODE, &mut rng, t0);
        let before = session.items().to_vec();
        assert_eq!(session.move_line(1, 1, t0).cues, vec![Cue::Drop]);
        assert_eq!(session.move_line(0, 9, t0).cues, vec![Cue::Drop]);
        assert_eq!(session.items(), before.as_slice());
    }

    #[test]
    fn test_duplicate_lines_match_by_content() {
        let code = "}\n}";
        let mut rng = SmallRng::seed_from_u64(0);
        let session = ReorderSession::new(code, &mut rng, Instant::now());
        assert!(session.is_line_correct(0));
        assert!(session.is_line_correct(1));
    }

    #[test]
    fn test_wpm_uses_elapsed_wall_time() {
        let mut rng = SmallRng::seed_from_u64(3);
        let t0 = Instant::now();
        let mut session = ReorderSession::new("abcde\nfghij", &mut rng, t0);
        let out = session.move_line(0, 1, t0 + ms(60_000));
        let stats = out.stats.unwrap();
        assert!((stats.wpm - 2.0).abs() < 1e-9);
        assert_eq!(stats.time_elapsed, 60);
    }
}
