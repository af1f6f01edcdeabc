use std::io::{self, Stdout, Write};

/// Audible cue requested by a session transition. Purely cosmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Error,
    Combo,
    Drag,
    Drop,
    PlaceCorrect,
}

/// Plays cues. Implementations must not block and must swallow their own
/// failures.
pub trait FeedbackSink {
    fn play(&mut self, cue: Cue);

    fn play_all(&mut self, cues: &[Cue]) {
        for &cue in cues {
            self.play(cue);
        }
    }
}

pub struct Silent;

impl FeedbackSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell on mistakes. The terminal has no way to render
/// the softer cues.
pub struct TerminalBell<W: Write = Stdout> {
    out: W,
}

impl TerminalBell {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> FeedbackSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        if cue != Cue::Error {
            return;
        }
        // A missed bell only loses a sound; the keystroke is already scored.
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            log::debug!(target: "feedback", "bell failed: {e}");
        }
    }
}
