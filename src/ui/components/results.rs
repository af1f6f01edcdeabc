use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use dsarush::highlight::SyntaxClass;
use dsarush::session::TestStats;
use dsarush::snippet::Snippet;

use crate::ui::theme::Theme;

/// Completion screen: the final numbers plus a line-by-line breakdown of the
/// snippet with its explanations.
pub struct Results<'a> {
    stats: &'a TestStats,
    snippet: &'a Snippet,
    syntax: &'a [Vec<SyntaxClass>],
    theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(
        stats: &'a TestStats,
        snippet: &'a Snippet,
        syntax: &'a [Vec<SyntaxClass>],
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            snippet,
            syntax,
            theme,
        }
    }

    fn code_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let gutter = Style::default().fg(colors.accent_dim());
        let note = Style::default()
            .fg(colors.text_pending())
            .add_modifier(Modifier::ITALIC);

        let mut out = Vec::new();
        for (idx, text) in self.snippet.lines().enumerate() {
            let classes = self.syntax.get(idx).map(Vec::as_slice).unwrap_or(&[]);
            let mut spans = vec![Span::styled(format!("{:>3} ", idx + 1), gutter)];
            spans.extend(highlighted_spans(text, classes, self.theme));
            out.push(Line::from(spans));

            if let Some(explanation) = self.snippet.explanation_for(idx + 1) {
                out.push(Line::from(vec![
                    Span::styled("    \u{2514} ", gutter),
                    Span::styled(explanation.to_string(), note),
                ]));
            }
        }
        out
    }
}

/// Group consecutive characters of the same class into one span.
fn highlighted_spans(text: &str, classes: &[SyntaxClass], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_class = None;

    for (i, ch) in text.chars().enumerate() {
        let class = classes.get(i).copied().unwrap_or_default();
        if run_class.is_some_and(|c| c != class) {
            let style = Style::default().fg(theme.colors.syntax(run_class.unwrap_or_default()));
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_class = Some(class);
        run.push(ch);
    }
    if !run.is_empty() {
        let style = Style::default().fg(theme.colors.syntax(run_class.unwrap_or_default()));
        spans.push(Span::styled(run, style));
    }
    spans
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Snippet Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                self.snippet.topic.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", self.snippet.display_title()),
                Style::default().fg(colors.text_pending()),
            ),
        ]))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let acc_color = if self.stats.accuracy >= 95.0 {
            colors.success()
        } else if self.stats.accuracy >= 85.0 {
            colors.accent()
        } else {
            colors.error()
        };
        let error_color = if self.stats.errors == 0 {
            colors.success()
        } else {
            colors.error()
        };

        let stats_lines = vec![
            Line::from(vec![
                Span::styled("  Speed:     ", label),
                Span::styled(format!("{:.0} WPM", self.stats.wpm), value),
                Span::styled("     Accuracy:  ", label),
                Span::styled(
                    format!("{:.0}%", self.stats.accuracy),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Max combo: ", label),
                Span::styled(format!("{}", self.stats.max_combo), value),
                Span::styled("         Time:      ", label),
                Span::styled(format!("{}s", self.stats.time_elapsed), label),
            ]),
            Line::from(vec![
                Span::styled("  Errors:    ", label),
                Span::styled(format!("{}", self.stats.errors), Style::default().fg(error_color)),
                Span::styled("         Chars:     ", label),
                Span::styled(format!("{}", self.stats.total_chars), label),
            ]),
        ];
        Paragraph::new(stats_lines).render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            "  Code breakdown",
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        )))
        .render(layout[2], buf);

        Paragraph::new(self.code_lines())
            .wrap(Wrap { trim: false })
            .render(layout[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Next snippet  ", Style::default().fg(colors.accent())),
            Span::styled("[h] History  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[4], buf);
    }
}
