//! Reading list panel and the entry detail view.

use super::helpers::{pad_to_width, panel_block, truncate_with_ellipsis, Focus};
use super::Row;
use crate::describe::{
    author_list, date_text, format_text, genre_text, language_text, publisher_text,
    purchase_text, star_rating,
};
use crate::theme::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{HighlightSpacing, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const INDENT: &str = "  ";
/// Star string plus the space before it.
const STARS_WIDTH: usize = 6;

impl super::App {
    pub(super) fn render_list_panel(&mut self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let focused = self.focus == Focus::List;
        let title = format!(" READING LIST · {} ", self.policy.name().to_uppercase());
        let block = panel_block(&title, " ↑↓: scroll │ Enter: details ", focused, &colors);

        if let Some(err) = &self.list_error {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(err.as_str())
                    .style(Style::default().fg(colors.error))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }

        let inner_width = area.width.saturating_sub(2);
        if self.cached_items.is_empty() || self.cached_width != inner_width {
            self.rebuild_list_cache(inner_width);
        }

        let list = List::new(self.cached_items.clone())
            .block(block)
            .highlight_style(if focused {
                Style::default()
                    .bg(colors.bg_highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(colors.bg_tertiary)
            })
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn rebuild_list_cache(&mut self, width: u16) {
        self.cached_width = width;
        let colors = self.theme.colors();
        // Two columns go to the highlight symbol.
        let avail = width.saturating_sub(2) as usize;
        self.cached_items = self
            .rows
            .iter()
            .map(|row| ListItem::new(self.row_line(row, avail, &colors)))
            .collect();
    }

    fn row_line(&self, row: &Row, avail: usize, colors: &ThemeColors) -> Line<'static> {
        match row {
            Row::Header {
                label,
                level,
                count,
            } => {
                let text = format!("{}{} ({})", INDENT.repeat(*level), label, count);
                Line::from(Span::styled(
                    truncate_with_ellipsis(&text, avail),
                    Style::default()
                        .fg(colors.level_color(*level))
                        .add_modifier(Modifier::BOLD),
                ))
            }
            Row::Entry { index, level } => {
                let Some(entry) = self.data.reading_list.entries.get(*index) else {
                    return Line::default();
                };
                let indent = INDENT.repeat(*level);
                let title_width = avail.saturating_sub(indent.width() + STARS_WIDTH);
                let title = pad_to_width(
                    &truncate_with_ellipsis(&entry.book.title, title_width),
                    title_width,
                );
                let title_style = if entry.is_read_completely {
                    Style::default().fg(colors.completed)
                } else {
                    Style::default()
                        .fg(colors.not_completed)
                        .add_modifier(Modifier::ITALIC)
                };
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(title, title_style),
                    Span::raw(" "),
                    Span::styled(
                        star_rating(entry.rating),
                        Style::default().fg(colors.rating),
                    ),
                ])
            }
        }
    }

    pub(super) fn render_entry_detail(&self, frame: &mut Frame, area: Rect, index: usize) {
        let colors = self.theme.colors();
        let block = panel_block(" DETAILS ", " Esc: close ", true, &colors);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = self.data.reading_list.entries.get(index) else {
            return;
        };
        let book = &entry.book;
        let muted = Style::default().fg(colors.text_muted);
        let text = Style::default().fg(colors.text_secondary);

        let mut lines = vec![
            Line::from(Span::styled(
                book.title.clone(),
                Style::default()
                    .fg(colors.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("by {}", author_list(book)), text)),
            Line::from(vec![
                Span::styled(star_rating(entry.rating), Style::default().fg(colors.rating)),
                Span::styled(format!("  {}  ", date_text(entry)), muted),
                if entry.is_read_completely {
                    Span::styled("finished", Style::default().fg(colors.completed))
                } else {
                    Span::styled(
                        "not finished",
                        Style::default()
                            .fg(colors.not_completed)
                            .add_modifier(Modifier::ITALIC),
                    )
                },
            ]),
            Line::default(),
            Line::from(Span::styled(
                publisher_text(&book.publisher, book.published_year),
                text,
            )),
            Line::from(Span::styled(language_text(book), text)),
            Line::from(Span::styled(genre_text(book), text)),
        ];
        if let Some(format) = format_text(book) {
            lines.push(Line::from(Span::styled(format, text)));
        }
        lines.push(Line::from(Span::styled(purchase_text(&entry.purchase), text)));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
