use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use dsarush::config::{Config, PracticeMode};
use dsarush::feedback::{Cue, FeedbackSink, Silent, TerminalBell};
use dsarush::highlight::{SyntaxClass, syntax_lines, syntax_map};
use dsarush::session::{KeyInput, ReorderSession, Session, TestStats, TypingSession};
use dsarush::snippet::{Snippet, SnippetLibrary, select_snippet};
use dsarush::store::{JsonStore, SessionHistory};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Result,
    History,
}

/// Keyboard stand-in for drag and drop: a cursor row and whether the line
/// under it is currently held.
pub struct ReorderState {
    pub session: ReorderSession,
    pub cursor: usize,
    pub grabbed: bool,
}

pub enum Practice {
    Typing(TypingSession),
    Reorder(ReorderState),
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub library: SnippetLibrary,
    pub snippet: Snippet,
    pub syntax: Vec<SyntaxClass>,
    pub syntax_lines: Vec<Vec<SyntaxClass>>,
    pub practice: Practice,
    pub last_stats: Option<TestStats>,
    pub history: SessionHistory,
    pub theme: Theme,
    pub should_quit: bool,
    store: Option<JsonStore>,
    feedback: Box<dyn FeedbackSink>,
    rng: SmallRng,
}

impl App {
    pub fn new(mut config: Config, theme: Theme) -> Result<Self> {
        let library = SnippetLibrary::load()?;
        config.normalize(&library);

        let store = match JsonStore::new() {
            Ok(store) => Some(store.with_history_limit(config.history_limit)),
            Err(e) => {
                warn!(target: "app", "history disabled: {e}");
                None
            }
        };
        let feedback: Box<dyn FeedbackSink> = if config.sound {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(Silent)
        };

        Ok(Self::with_parts(
            config,
            library,
            store,
            feedback,
            SmallRng::from_entropy(),
            theme,
            Instant::now(),
        ))
    }

    pub fn with_parts(
        config: Config,
        library: SnippetLibrary,
        store: Option<JsonStore>,
        feedback: Box<dyn FeedbackSink>,
        mut rng: SmallRng,
        theme: Theme,
        now: Instant,
    ) -> Self {
        let history = SessionHistory {
            sessions: store.as_ref().map(JsonStore::load_history).unwrap_or_default(),
        };
        let snippet = select_snippet(&library, &config.query(), &mut rng, Utc::now());
        let practice = build_practice(&snippet, &config, &mut rng, now);

        Self {
            screen: AppScreen::Practice,
            syntax: syntax_map(&snippet.code),
            syntax_lines: syntax_lines(&snippet.code),
            config,
            library,
            snippet,
            practice,
            last_stats: None,
            history,
            theme,
            should_quit: false,
            store,
            feedback,
            rng,
        }
    }

    /// Pick a fresh snippet for the current filters and start over.
    pub fn new_snippet(&mut self, now: Instant) {
        self.snippet = select_snippet(&self.library, &self.config.query(), &mut self.rng, Utc::now());
        self.syntax = syntax_map(&self.snippet.code);
        self.syntax_lines = syntax_lines(&self.snippet.code);
        self.restart(now);
    }

    /// Same snippet, new attempt.
    pub fn restart(&mut self, now: Instant) {
        self.practice = build_practice(&self.snippet, &self.config, &mut self.rng, now);
        self.last_stats = None;
        self.screen = AppScreen::Practice;
    }

    pub fn type_key(&mut self, input: KeyInput, now: Instant) {
        let Practice::Typing(session) = &mut self.practice else {
            return;
        };
        let transition = session.process(input, now);
        self.feedback.play_all(&transition.cues);
        if let Some(stats) = transition.stats {
            self.finish(stats);
        }
    }

    pub fn reorder_up(&mut self, now: Instant) {
        self.reorder_step(-1, now);
    }

    pub fn reorder_down(&mut self, now: Instant) {
        self.reorder_step(1, now);
    }

    fn reorder_step(&mut self, delta: isize, now: Instant) {
        let Practice::Reorder(state) = &mut self.practice else {
            return;
        };
        let len = state.session.items().len();
        let Some(target) = state.cursor.checked_add_signed(delta).filter(|&t| t < len) else {
            return;
        };
        if !state.grabbed {
            state.cursor = target;
            return;
        }

        let transition = state.session.move_line(state.cursor, target, now);
        state.cursor = target;
        if transition.stats.is_some() {
            state.grabbed = false;
        }
        self.feedback.play_all(&transition.cues);
        if let Some(stats) = transition.stats {
            self.finish(stats);
        }
    }

    /// Pick up or put down the line under the cursor.
    pub fn toggle_grab(&mut self) {
        let Practice::Reorder(state) = &mut self.practice else {
            return;
        };
        if state.session.is_complete() {
            return;
        }
        state.grabbed = !state.grabbed;
        let cue = if state.grabbed { Cue::Drag } else { Cue::Drop };
        self.feedback.play(cue);
    }

    fn finish(&mut self, stats: TestStats) {
        let session = Session::from_stats(&stats, &self.snippet, &mut self.rng, Utc::now());
        info!(
            target: "app",
            "completed {} ({}): {:.0} wpm, {:.0}% accuracy, max combo {}",
            self.snippet.id, self.config.mode.as_str(), stats.wpm, stats.accuracy, stats.max_combo
        );

        let saved = match &self.store {
            Some(store) => match store.save_session(session.clone()) {
                Ok(sessions) => Some(sessions),
                Err(e) => {
                    warn!(target: "app", "failed to save session: {e}");
                    None
                }
            },
            None => None,
        };
        match saved {
            Some(sessions) => self.history.sessions = sessions,
            None => self.history.push_front(session, self.config.history_limit),
        }

        self.last_stats = Some(stats);
        self.screen = AppScreen::Result;
    }

    /// Summary of the last finished attempt, for pasting elsewhere.
    pub fn share_text(&self) -> Option<String> {
        self.last_stats
            .as_ref()
            .map(|stats| stats.share_text(&self.snippet))
    }

    pub fn show_history(&mut self) {
        self.screen = AppScreen::History;
    }

    /// Leave the history screen for whatever it was opened from.
    pub fn close_history(&mut self) {
        self.screen = if self.last_stats.is_some() {
            AppScreen::Result
        } else {
            AppScreen::Practice
        };
    }

    pub fn clear_history(&mut self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear_history() {
                warn!(target: "app", "failed to clear history: {e}");
                return;
            }
        }
        self.history = SessionHistory::default();
    }

    pub fn toggle_mode(&mut self, now: Instant) {
        self.config.mode = self.config.mode.toggle();
        self.restart(now);
    }

    pub fn cycle_difficulty(&mut self, now: Instant) {
        self.config.difficulty = self.config.difficulty.next();
        self.new_snippet(now);
    }

    pub fn cycle_language(&mut self, now: Instant) {
        self.config.language = self.config.language.next();
        if let Some(sub) = &self.config.sub_topic {
            let ops = self
                .library
                .operations_for_topic(&self.config.topic, self.config.language);
            if !ops.contains(&sub.as_str()) {
                self.config.sub_topic = None;
            }
        }
        self.new_snippet(now);
    }

    pub fn cycle_topic(&mut self, forward: bool, now: Instant) {
        let topics = self.library.topics();
        let idx = topics
            .iter()
            .position(|t| *t == self.config.topic)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % topics.len()
        } else {
            (idx + topics.len() - 1) % topics.len()
        };
        self.config.topic = topics[next].clone();
        self.config.sub_topic = None;
        self.new_snippet(now);
    }

    /// Step through the topic's operations, then back to the whole topic.
    pub fn cycle_sub_topic(&mut self, now: Instant) {
        let ops = self
            .library
            .operations_for_topic(&self.config.topic, self.config.language);
        let next = match &self.config.sub_topic {
            None => ops.first(),
            Some(current) => ops
                .iter()
                .position(|op| *op == current.as_str())
                .and_then(|i| ops.get(i + 1)),
        };
        self.config.sub_topic = next.map(|op| op.to_string());
        self.new_snippet(now);
    }
}

fn build_practice(snippet: &Snippet, config: &Config, rng: &mut SmallRng, now: Instant) -> Practice {
    match config.mode {
        PracticeMode::Typing => Practice::Typing(TypingSession::new(&snippet.code, config.scoring())),
        PracticeMode::Reorder => Practice::Reorder(ReorderState {
            session: ReorderSession::new(&snippet.code, rng, now),
            cursor: 0,
            grabbed: false,
        }),
    }
}
