use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use dsarush::session::Session;
use dsarush::store::HistoryStats;

use crate::ui::theme::Theme;

pub struct HistoryTable<'a> {
    sessions: &'a [Session],
    stats: Option<&'a HistoryStats>,
    theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(sessions: &'a [Session], stats: Option<&'a HistoryStats>, theme: &'a Theme) -> Self {
        Self {
            sessions,
            stats,
            theme,
        }
    }
}

fn session_row(session: &Session) -> String {
    let date = session
        .timestamp
        .with_timezone(&Local)
        .format("%m/%d %H:%M")
        .to_string();
    format!(
        " {date}  {wpm:>5.0}  {acc:>5.0}%  {combo:>5}  {lang:<5} {topic} / {title}",
        wpm = session.wpm,
        acc = session.accuracy,
        combo = session.max_combo,
        lang = session.language.as_str(),
        topic = session.topic,
        title = session.title,
    )
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Recent Sessions ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let summary = match self.stats {
            Some(stats) => Line::from(vec![
                Span::styled("  Sessions ", Style::default().fg(colors.text_pending())),
                Span::styled(format!("{}", stats.total_sessions), Style::default().fg(colors.fg())),
                Span::styled("   Avg ", Style::default().fg(colors.text_pending())),
                Span::styled(format!("{:.0} wpm", stats.avg_wpm), Style::default().fg(colors.fg())),
                Span::styled("   Best ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{:.0} wpm", stats.max_wpm),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Best acc ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    format!("{:.0}%", stats.max_accuracy),
                    Style::default().fg(colors.success()),
                ),
            ]),
            None => Line::from(Span::styled(
                "  No sessions yet. Finish a snippet to start your history.",
                Style::default().fg(colors.text_pending()),
            )),
        };
        Paragraph::new(summary).render(layout[0], buf);

        let mut lines = vec![
            Line::from(Span::styled(
                " Date          WPM    Acc  Combo  Lang  Snippet",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", "\u{2500}".repeat(inner.width.saturating_sub(2) as usize)),
                Style::default().fg(colors.border()),
            )),
        ];
        for session in self.sessions {
            let acc_color = if session.accuracy >= 95.0 {
                colors.success()
            } else if session.accuracy >= 85.0 {
                colors.fg()
            } else {
                colors.error()
            };
            lines.push(Line::from(Span::styled(
                session_row(session),
                Style::default().fg(acc_color),
            )));
        }
        Paragraph::new(lines).render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [Esc/q] Back  ", Style::default().fg(colors.accent())),
            Span::styled("[x] Clear history", Style::default().fg(colors.accent())),
        ]))
        .render(layout[2], buf);
    }
}
