use std::time::{Duration, Instant};

use log::debug;

use crate::feedback::Cue;
use crate::session::input::{Key, KeyInput};
use crate::session::result::TestStats;

pub const DEFAULT_HESITATION: Duration = Duration::from_millis(2000);
pub const MAX_MULTIPLIER: f64 = 8.0;
pub const MULTIPLIER_STEP: f64 = 0.5;
const MAX_TAB_SPACES: usize = 4;
const FALLBACK_TAB_SPACES: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringConfig {
    /// Longest pause between keystrokes that keeps the combo alive.
    pub hesitation: Duration,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hesitation: DEFAULT_HESITATION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Deleted,
    Accepted {
        inserted: usize,
        line_complete: bool,
    },
    Rejected,
}

/// Result of feeding one key to a [`TypingSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub outcome: Outcome,
    pub cues: Vec<Cue>,
    /// Present exactly once, on the keystroke that completes the session.
    pub stats: Option<TestStats>,
}

impl Transition {
    fn ignored() -> Self {
        Self {
            outcome: Outcome::Ignored,
            cues: Vec::new(),
            stats: None,
        }
    }
}

/// Keystroke-by-keystroke matcher for one target text.
///
/// Rejected keys are never inserted, so `input` is always a prefix of the
/// target and the cursor only moves forward on a correct key.
pub struct TypingSession {
    target: Vec<char>,
    input: Vec<char>,
    config: ScoringConfig,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    last_keystroke: Option<Instant>,
    errors: u32,
    combo: u32,
    max_combo: u32,
    multiplier: f64,
    line_perfect: bool,
}

impl TypingSession {
    pub fn new(text: &str, config: ScoringConfig) -> Self {
        Self {
            target: text.chars().collect(),
            input: Vec::new(),
            config,
            started_at: None,
            finished_at: None,
            last_keystroke: None,
            errors: 0,
            combo: 0,
            max_combo: 0,
            multiplier: 1.0,
            line_perfect: true,
        }
    }

    /// Back to `Idle` on the same target.
    pub fn reset(&mut self) {
        *self = Self::new(&self.target.iter().collect::<String>(), self.config);
    }

    pub fn process(&mut self, key: KeyInput, now: Instant) -> Transition {
        if key.modifiers.is_reserved() || self.phase() == Phase::Complete {
            return Transition::ignored();
        }
        if self.input.len() >= self.target.len() && key.key != Key::Backspace {
            return Transition::ignored();
        }

        match self.last_keystroke {
            None => self.started_at = Some(now),
            Some(last) => {
                if now.saturating_duration_since(last) > self.config.hesitation {
                    debug!(target: "session", "hesitation, combo {} dropped", self.combo);
                    self.break_combo();
                }
            }
        }
        self.last_keystroke = Some(now);

        let mut transition = match key.key {
            Key::Backspace => {
                self.input.pop();
                self.break_combo();
                Transition {
                    outcome: Outcome::Deleted,
                    cues: vec![Cue::Correct],
                    stats: None,
                }
            }
            Key::Enter => match self.auto_indent() {
                Some(text) => self.submit(&text, true),
                None => self.submit(&['\n'], false),
            },
            Key::Tab => {
                let text = vec![' '; self.tab_width()];
                self.submit(&text, false)
            }
            Key::Char(ch) => self.submit(&[ch], false),
        };

        if self.input.len() == self.target.len() {
            if let Some(start) = self.started_at {
                self.finished_at = Some(now);
                transition.stats = Some(self.final_stats(now.saturating_duration_since(start)));
            }
        }
        transition
    }

    /// Newline plus the indentation of the next line, when the target
    /// expects a newline at the cursor.
    fn auto_indent(&self) -> Option<Vec<char>> {
        let pos = self.input.len();
        if self.target.get(pos) != Some(&'\n') {
            return None;
        }
        let indent = self.target[pos + 1..].iter().take_while(|&&c| c == ' ').count();
        Some(self.target[pos..pos + 1 + indent].to_vec())
    }

    fn tab_width(&self) -> usize {
        let expected = self.target[self.input.len()..]
            .iter()
            .take_while(|&&c| c == ' ')
            .count();
        if expected == 0 {
            FALLBACK_TAB_SPACES
        } else {
            expected.min(MAX_TAB_SPACES)
        }
    }

    fn submit(&mut self, text: &[char], auto_indented: bool) -> Transition {
        let pos = self.input.len();
        let expected = &self.target[pos..(pos + text.len()).min(self.target.len())];

        if text != expected {
            self.errors += 1;
            self.break_combo();
            return Transition {
                outcome: Outcome::Rejected,
                cues: vec![Cue::Error],
                stats: None,
            };
        }

        let mut cues = vec![Cue::Correct];
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let line_complete = auto_indented || text == ['\n'];
        if line_complete {
            if self.line_perfect {
                self.multiplier = (self.multiplier + MULTIPLIER_STEP).min(MAX_MULTIPLIER);
                cues.push(Cue::Combo);
            }
            self.line_perfect = true;
        }

        self.input.extend_from_slice(text);
        Transition {
            outcome: Outcome::Accepted {
                inserted: text.len(),
                line_complete,
            },
            cues,
            stats: None,
        }
    }

    fn break_combo(&mut self) {
        self.combo = 0;
        self.multiplier = 1.0;
        self.line_perfect = false;
    }

    fn final_stats(&self, elapsed: Duration) -> TestStats {
        let secs = elapsed.as_secs_f64();
        let total = self.target.len();
        let accuracy = if total == 0 {
            100.0
        } else {
            (100.0 - self.errors as f64 / total as f64 * 100.0).max(0.0)
        };
        TestStats {
            wpm: TestStats::wpm_for(total, secs),
            accuracy,
            time_elapsed: secs.round() as u64,
            errors: self.errors,
            total_chars: total,
            max_combo: self.combo.max(self.max_combo),
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at, self.finished_at) {
            (_, Some(_)) => Phase::Complete,
            (Some(_), None) => Phase::Active,
            (None, None) => Phase::Idle,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.input.len()
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.input.len() as f64 / self.target.len() as f64
    }

    /// Speed so far, over the characters already matched.
    pub fn live_wpm(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => {
                let end = self.finished_at.unwrap_or(now);
                TestStats::wpm_for(self.input.len(), end.saturating_duration_since(start).as_secs_f64())
            }
            None => 0.0,
        }
    }
}
