use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// How far through the snippet the user is: characters typed in typing
/// mode, lines in place in reorder mode.
pub struct ProgressBar<'a> {
    done: usize,
    total: usize,
    unit: &'static str,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(done: usize, total: usize, unit: &'static str, theme: &'a Theme) -> Self {
        Self {
            done: done.min(total),
            total,
            unit,
            theme,
        }
    }

    fn label(&self) -> String {
        format!(" {}/{} {}", self.done, self.total, self.unit)
    }
}

/// Cells of a `width`-wide track to fill. An empty snippet counts as done.
fn filled_cells(done: usize, total: usize, width: usize) -> usize {
    if total == 0 {
        return width;
    }
    done * width / total
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = self.label();
        let track = (inner.width as usize).saturating_sub(label.chars().count());
        if track == 0 {
            return;
        }
        let filled = filled_cells(self.done, self.total, track);

        let line = Line::from(vec![
            Span::styled("\u{2588}".repeat(filled), Style::default().fg(colors.accent())),
            Span::styled(
                "\u{2591}".repeat(track - filled),
                Style::default().fg(colors.accent_dim()),
            ),
            Span::styled(
                label,
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}
