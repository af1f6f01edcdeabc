use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Platform command key (super/meta).
    pub command: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Shortcut chords the typing area must not swallow. Control with alt
    /// is AltGr on many layouts and still produces text.
    pub fn is_reserved(&self) -> bool {
        self.command || (self.control && !self.alt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    /// Translate a terminal key event. Keys that never reach the typing
    /// area (arrows, function keys, releases) map to `None`.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match event.code {
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            _ => return None,
        };
        let mods = event.modifiers;
        Some(Self {
            key,
            modifiers: Modifiers {
                command: mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
                control: mods.contains(KeyModifiers::CONTROL),
                alt: mods.contains(KeyModifiers::ALT),
            },
        })
    }
}

/// Expand an input string into the keys a user would press, with `\n` as
/// Enter and `\t` as Tab.
pub fn keys_for(text: &str) -> Vec<KeyInput> {
    text.chars()
        .map(|ch| match ch {
            '\n' => KeyInput::plain(Key::Enter),
            '\t' => KeyInput::plain(Key::Tab),
            _ => KeyInput::char(ch),
        })
        .collect()
}

/// Keys a user actually presses to type `text` in a typing session: the
/// indentation after each newline is inserted by Enter, so it is skipped.
pub fn strokes_for(text: &str) -> Vec<KeyInput> {
    let mut keys = Vec::new();
    let mut after_newline = false;
    for ch in text.chars() {
        if after_newline && ch == ' ' {
            continue;
        }
        after_newline = ch == '\n';
        keys.push(match ch {
            '\n' => KeyInput::plain(Key::Enter),
            '\t' => KeyInput::plain(Key::Tab),
            _ => KeyInput::char(ch),
        });
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_modifiers() {
        let ctrl = Modifiers { control: true, ..Default::default() };
        let alt_gr = Modifiers { control: true, alt: true, ..Default::default() };
        let cmd = Modifiers { command: true, ..Default::default() };
        assert!(ctrl.is_reserved());
        assert!(!alt_gr.is_reserved());
        assert!(cmd.is_reserved());
        assert!(!Modifiers::default().is_reserved());
    }

    #[test]
    fn test_from_key_event_maps_typing_keys() {
        let ev = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::SHIFT);
        assert_eq!(KeyInput::from_key_event(&ev), Some(KeyInput::char('x')));

        let ev = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(KeyInput::from_key_event(&ev).map(|k| k.key), Some(Key::Tab));

        let ev = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(KeyInput::from_key_event(&ev), None);
    }

    #[test]
    fn test_from_key_event_carries_modifiers() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let input = KeyInput::from_key_event(&ev).unwrap();
        assert!(input.modifiers.control);
        assert!(input.modifiers.is_reserved());

        let ev = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::SUPER);
        assert!(KeyInput::from_key_event(&ev).unwrap().modifiers.command);
    }

    #[test]
    fn test_keys_for_maps_whitespace_controls() {
        let keys = keys_for("a\n\tb");
        assert_eq!(
            keys.iter().map(|k| k.key).collect::<Vec<_>>(),
            vec![Key::Char('a'), Key::Enter, Key::Tab, Key::Char('b')]
        );
    }

    #[test]
    fn test_strokes_for_skips_auto_indent() {
        let keys = strokes_for("if (x) {\n    y;\n}");
        let typed: String = keys
            .iter()
            .map(|k| match k.key {
                Key::Char(c) => c,
                Key::Enter => '|',
                _ => '?',
            })
            .collect();
        assert_eq!(typed, "if (x) {|y;|}");
    }
}
