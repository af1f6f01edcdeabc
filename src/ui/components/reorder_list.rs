use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use dsarush::session::ReorderSession;

use crate::ui::theme::Theme;

pub struct ReorderList<'a> {
    session: &'a ReorderSession,
    cursor: usize,
    grabbed: bool,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> ReorderList<'a> {
    pub fn new(
        session: &'a ReorderSession,
        cursor: usize,
        grabbed: bool,
        now: Instant,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            cursor,
            grabbed,
            now,
            theme,
        }
    }
}

impl Widget for ReorderList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let error_line = self.session.error_line(self.now);

        let lines: Vec<Line> = self
            .session
            .items()
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let placed = self.session.is_interacted(item.id) && self.session.is_line_correct(idx);
                let mut style = if error_line == Some(item.id) {
                    Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                } else if placed {
                    Style::default().fg(colors.success())
                } else {
                    Style::default().fg(colors.fg())
                };
                let marker = if idx != self.cursor {
                    "   "
                } else if self.grabbed {
                    "\u{2195}  "
                } else {
                    "\u{203a}  "
                };
                if idx == self.cursor {
                    style = style.add_modifier(Modifier::BOLD);
                    if self.grabbed {
                        style = style.bg(colors.header_bg());
                    }
                }
                let check = if placed { "  \u{2713}" } else { "" };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(colors.accent())),
                    Span::styled(item.content.clone(), style),
                    Span::styled(check, Style::default().fg(colors.success())),
                ])
            })
            .collect();

        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = self.cursor.saturating_sub(inner_height / 2) as u16;

        let block = Block::bordered()
            .title(" reorder ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines)
            .block(block)
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
