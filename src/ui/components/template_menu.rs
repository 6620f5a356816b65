use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::template::Template;
use crate::engine::timing::format_average;
use crate::ui::theme::Theme;

pub struct MenuRow<'a> {
    pub template: &'a Template,
    pub average: Option<f64>,
}

/// The template list: title, category and rolling average per row.
pub struct TemplateMenu<'a> {
    rows: Vec<MenuRow<'a>>,
    selected: usize,
    query: &'a str,
    searching: bool,
    show_category: bool,
    theme: &'a Theme,
}

impl<'a> TemplateMenu<'a> {
    pub fn new(rows: Vec<MenuRow<'a>>, selected: usize, theme: &'a Theme) -> Self {
        Self {
            rows,
            selected,
            query: "",
            searching: false,
            show_category: true,
            theme,
        }
    }

    pub fn search(mut self, query: &'a str, searching: bool) -> Self {
        self.query = query;
        self.searching = searching;
        self
    }

    pub fn show_category(mut self, show: bool) -> Self {
        self.show_category = show;
        self
    }
}

/// First row to draw so that `selected` stays on screen.
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    selected.saturating_sub(visible - 1)
}

fn row_text(row: &MenuRow, selected: bool, show_category: bool, width: usize) -> String {
    let indicator = if selected { ">" } else { " " };
    let average = format_average(row.average);
    let left = if show_category {
        format!(
            " {indicator} {:<24} {:<11}",
            row.template.title,
            row.template.category.as_str()
        )
    } else {
        format!(" {indicator} {}", row.template.title)
    };
    let pad = width.saturating_sub(left.chars().count() + average.chars().count() + 1);
    format!("{left}{}{average} ", " ".repeat(pad))
}

impl Widget for TemplateMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.searching || !self.query.is_empty() {
            format!(" Search: {}{} ", self.query, if self.searching { "_" } else { "" })
        } else {
            " Templates ".to_string()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.searching {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No templates match",
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let visible = inner.height as usize;
        let offset = scroll_offset(self.selected, visible);
        let width = inner.width as usize;

        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, row)| {
                let is_selected = i == self.selected;
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else if row.average.is_none() {
                    Style::default().fg(colors.muted())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(
                    row_text(row, is_selected, self.show_category, width),
                    style,
                ))
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Catalog;

    #[test]
    fn test_scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(14, 5), 10);
        assert_eq!(scroll_offset(3, 0), 0);
    }

    #[test]
    fn test_row_text_shows_average_or_placeholder() {
        let catalog = Catalog::builtin().unwrap();
        let template = catalog.find("Division").unwrap();

        let row = MenuRow { template, average: Some(3.456) };
        let text = row_text(&row, true, true, 60);
        assert!(text.starts_with(" > Division"));
        assert!(text.contains("Arithmetic"));
        assert!(text.ends_with("3.46 "));
        assert_eq!(text.chars().count(), 60);

        let row = MenuRow { template, average: None };
        let text = row_text(&row, false, false, 30);
        assert!(text.starts_with("   Division"));
        assert!(text.ends_with("— "));
        assert!(!text.contains("Arithmetic"));
    }
}
