use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::timing::format_average;
use crate::session::card::Solve;
use crate::session::round::Round;
use crate::ui::layout::pack_hint_lines;
use crate::ui::theme::Theme;

const KEYPAD_HINTS: &[&str] = &[
    "[0-9] digit",
    "[Bksp] delete",
    "[-] sign",
    "[Tab/→] next field",
    "[S-Tab/←] prev field",
    "[Esc] menu",
];

/// Width of the number inside one answer field.
const FIELD_WIDTH: usize = 7;

pub struct CardView<'a> {
    title: &'a str,
    round: &'a Round,
    average: Option<f64>,
    solved: u32,
    last_solve: Option<&'a Solve>,
    show_hints: bool,
    theme: &'a Theme,
}

impl<'a> CardView<'a> {
    pub fn new(title: &'a str, round: &'a Round, theme: &'a Theme) -> Self {
        Self {
            title,
            round,
            average: None,
            solved: 0,
            last_solve: None,
            show_hints: true,
            theme,
        }
    }

    pub fn stats(mut self, average: Option<f64>, solved: u32) -> Self {
        self.average = average;
        self.solved = solved;
        self
    }

    pub fn last_solve(mut self, solve: Option<&'a Solve>) -> Self {
        self.last_solve = solve;
        self
    }

    pub fn show_hints(mut self, show: bool) -> Self {
        self.show_hints = show;
        self
    }
}

/// Right-aligned field contents, padded to [`FIELD_WIDTH`].
fn field_text(value: i64) -> String {
    format!(" {value:>FIELD_WIDTH$} ")
}

fn solve_summary(solve: &Solve) -> String {
    let answer = solve
        .answer
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "✓ {}  →  {answer}  in {:.2}s",
        solve.display_text, solve.elapsed_secs
    )
}

impl Widget for CardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let hint_lines = if self.show_hints {
            pack_hint_lines(KEYPAD_HINTS, inner.width as usize)
        } else {
            Vec::new()
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(hint_lines.len() as u16),
            ])
            .split(inner);

        let problem_area = layout[0];
        let top_pad = problem_area.height.saturating_sub(1) as usize / 2;
        let mut problem_lines = vec![Line::from(""); top_pad];
        problem_lines.push(Line::from(Span::styled(
            self.round.display_text.as_str(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )));
        Paragraph::new(problem_lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(problem_area, buf);

        let mut fields: Vec<Span> = Vec::new();
        for (i, &value) in self.round.answer.iter().enumerate() {
            if i > 0 {
                fields.push(Span::raw("  "));
            }
            let style = if i == self.round.active_field {
                Style::default()
                    .fg(colors.field_active_fg())
                    .bg(colors.field_active_bg())
                    .add_modifier(Modifier::BOLD)
            } else if value == 0 {
                Style::default().fg(colors.muted()).bg(colors.field_bg())
            } else {
                Style::default().fg(colors.fg()).bg(colors.field_bg())
            };
            fields.push(Span::styled(field_text(value), style));
        }
        Paragraph::new(vec![Line::from(""), Line::from(fields)])
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        let stats = format!(
            "average {}s   solved {}",
            format_average(self.average),
            self.solved
        );
        Paragraph::new(Line::from(Span::styled(
            stats,
            Style::default().fg(colors.accent()),
        )))
        .alignment(Alignment::Center)
        .render(layout[3], buf);

        if let Some(solve) = self.last_solve {
            Paragraph::new(Line::from(Span::styled(
                solve_summary(solve),
                Style::default().fg(colors.success()),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }

        let hints: Vec<Line> = hint_lines
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.muted()))))
            .collect();
        Paragraph::new(hints).render(layout[5], buf);
    }
}
