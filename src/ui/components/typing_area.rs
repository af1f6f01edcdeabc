use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use dsarush::highlight::SyntaxClass;
use dsarush::session::TypingSession;

use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    syntax: &'a [SyntaxClass],
    theme: &'a Theme,
    title: &'a str,
}

impl<'a> TypingArea<'a> {
    pub fn new(
        session: &'a TypingSession,
        syntax: &'a [SyntaxClass],
        theme: &'a Theme,
        title: &'a str,
    ) -> Self {
        Self {
            session,
            syntax,
            theme,
            title,
        }
    }
}

/// A render token maps a single target character to its display representation.
struct RenderToken {
    target_idx: usize,
    display: char,
    is_line_break: bool,
}

/// The cursor needs a visible cell even when it sits on a newline.
fn build_render_tokens(target: &[char]) -> Vec<RenderToken> {
    target
        .iter()
        .enumerate()
        .map(|(i, &ch)| RenderToken {
            target_idx: i,
            display: if ch == '\n' { ' ' } else { ch },
            is_line_break: ch == '\n',
        })
        .collect()
}

/// Number of the line (0-based) holding the cursor.
fn cursor_line(target: &[char], cursor: usize) -> usize {
    target[..cursor.min(target.len())]
        .iter()
        .filter(|&&c| c == '\n')
        .count()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let target = self.session.target();
        let cursor = self.session.cursor();
        let tokens = build_render_tokens(target);

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for token in &tokens {
            let idx = token.target_idx;
            let style = if idx < cursor {
                let class = self.syntax.get(idx).copied().unwrap_or_default();
                Style::default().fg(colors.syntax(class))
            } else if idx == cursor {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
            } else {
                Style::default().fg(colors.text_pending())
            };
            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(token.display.to_string(), style));
            }
            if token.is_line_break {
                lines.push(Vec::new());
            }
        }

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner_height = block.inner(area).height as usize;

        // Keep the cursor line roughly centred once the snippet overflows.
        let focus = cursor_line(target, cursor);
        let scroll = focus.saturating_sub(inner_height / 2) as u16;

        let mut paragraph_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();
        if self.session.started_at().is_none() {
            paragraph_lines.push(Line::from(Span::styled(
                "start typing...",
                Style::default()
                    .fg(colors.accent_dim())
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(paragraph_lines)
            .block(block)
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
