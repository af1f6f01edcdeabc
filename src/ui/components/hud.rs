use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use dsarush::highlight::SyntaxClass;

use crate::ui::theme::Theme;

/// Live counters shown above the practice area.
pub enum HudStats {
    Typing {
        combo: u32,
        multiplier: f64,
        wpm: f64,
        errors: u32,
    },
    Reorder {
        elapsed_secs: u64,
        lines: usize,
    },
}

pub struct Hud<'a> {
    label: String,
    stats: HudStats,
    theme: &'a Theme,
}

impl<'a> Hud<'a> {
    pub fn new(label: String, stats: HudStats, theme: &'a Theme) -> Self {
        Self {
            label,
            stats,
            theme,
        }
    }
}

impl Widget for Hud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dim = Style::default().fg(colors.accent_dim());
        let value = Style::default().fg(colors.header_fg()).add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(format!(" {} ", self.label), dim), Span::raw("  ")];
        match self.stats {
            HudStats::Typing {
                combo,
                multiplier,
                wpm,
                errors,
            } => {
                let combo_style = if combo > 10 {
                    value.fg(colors.accent())
                } else {
                    value
                };
                let stream_style = if multiplier > 1.0 {
                    Style::default().fg(colors.syntax(SyntaxClass::Function))
                } else {
                    dim
                };
                spans.extend([
                    Span::styled(format!("{combo}"), combo_style),
                    Span::styled(" combo  ", dim),
                    Span::styled(format!("{multiplier:.1}x"), stream_style),
                    Span::styled(" stream  ", dim),
                    Span::styled(format!("{wpm:.0}"), value),
                    Span::styled(" wpm  ", dim),
                    Span::styled(format!("{errors}"), value.fg(colors.error())),
                    Span::styled(" typos", dim),
                ]);
            }
            HudStats::Reorder { elapsed_secs, lines } => {
                spans.extend([
                    Span::styled("rearrange lines correctly  ", dim),
                    Span::styled(format!("{elapsed_secs}s"), value),
                    Span::styled(format!("  {lines} lines"), dim),
                ]);
            }
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        Paragraph::new(Line::from(spans))
            .block(block)
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}
