//! Partition charts and the publisher city bar chart.
//!
//! Bars are laid out in virtual pixels, eight per terminal cell, and drawn
//! with left-eighth block characters so the gaps between segments survive at
//! terminal resolution.

use super::helpers::{pad_to_width, panel_block, truncate_with_ellipsis, ChartKind, Focus};
use crate::counts::{aggregate, children, CountTable};
use crate::partition::{layout_counts, PartitionSegment};
use crate::theme::{BarPalette, ChartPalette, ThemeColors};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const PX_PER_CELL: u32 = 8;
const LEFT_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];
const BAR_HEIGHT: u16 = 2;

/// One terminal cell of a bar. `fg` colors the left part of the glyph and
/// `bg` the rest; `None` is the panel background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BarCell {
    pub ch: char,
    pub fg: Option<usize>,
    pub bg: Option<usize>,
}

fn owner(segments: &[PartitionSegment], px: u32) -> Option<usize> {
    segments.iter().position(|s| px >= s.x && px < s.end())
}

/// Rasterize segments onto `cells` terminal cells.
pub(super) fn bar_cells(segments: &[PartitionSegment], cells: u16) -> Vec<BarCell> {
    (0..u32::from(cells))
        .map(|c| {
            let start = c * PX_PER_CELL;
            let first = owner(segments, start);
            let last = owner(segments, start + PX_PER_CELL - 1);
            if first == last {
                return BarCell {
                    ch: if first.is_some() { '█' } else { ' ' },
                    fg: first,
                    bg: None,
                };
            }
            let run = (1..PX_PER_CELL)
                .take_while(|&i| owner(segments, start + i) == first)
                .count();
            BarCell {
                ch: LEFT_BLOCKS[run + 1],
                fg: first,
                bg: last,
            }
        })
        .collect()
}

impl super::App {
    pub(super) fn render_chart_panel(&mut self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let focused = self.focus == Focus::Chart;
        let hint = match self.chart {
            ChartKind::PublisherCities => " ↑↓: scroll │ c: next chart ",
            _ => " c: next chart ",
        };
        let block = panel_block(self.chart.title(), hint, focused, &colors)
            .style(Style::default().bg(colors.bg_primary));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.chart {
            ChartKind::Genre => render_triple_chart(
                frame,
                inner,
                "genre",
                &self.genre_table,
                ThemeColors::GENRE_CHART,
                &colors,
            ),
            ChartKind::Language => render_triple_chart(
                frame,
                inner,
                "language",
                &self.language_table,
                ThemeColors::LANGUAGE_CHART,
                &colors,
            ),
            ChartKind::PublisherCities => self.render_publisher_bars(frame, inner),
        }
    }

    fn render_publisher_bars(&mut self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        if self.publisher_cities.is_empty() {
            frame.render_widget(
                Paragraph::new("No publisher data").style(Style::default().fg(colors.text_muted)),
                area,
            );
            return;
        }

        let visible = area.height as usize;
        self.chart_max_scroll = self.publisher_cities.len().saturating_sub(visible);
        self.chart_scroll = self.chart_scroll.min(self.chart_max_scroll);

        let max_count = self
            .publisher_cities
            .first()
            .map(|(_, c)| *c)
            .unwrap_or(1)
            .max(1);
        let name_width = 22.min(area.width.saturating_sub(16) as usize).max(6);
        let bar_max = area.width.saturating_sub((name_width + 12) as u16) as usize;

        let lines: Vec<Line> = self
            .publisher_cities
            .iter()
            .enumerate()
            .skip(self.chart_scroll)
            .take(visible)
            .map(|(i, (city, count))| {
                let bar_len = (*count as f64 / max_count as f64 * bar_max as f64) as usize;
                Line::from(vec![
                    Span::styled(
                        format!(" {:>2}. ", i + 1),
                        Style::default().fg(colors.text_muted),
                    ),
                    Span::styled(
                        format!(
                            "{} ",
                            pad_to_width(&truncate_with_ellipsis(city, name_width), name_width)
                        ),
                        Style::default().fg(colors.text_primary),
                    ),
                    Span::styled("█".repeat(bar_len), Style::default().fg(colors.publisher_bar)),
                    Span::styled(
                        "░".repeat(bar_max.saturating_sub(bar_len)),
                        Style::default().fg(colors.bg_highlight),
                    ),
                    Span::styled(
                        format!(" {:>3}", count),
                        Style::default()
                            .fg(colors.publisher_bar)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Root bar across the top, the two largest root groups split out below it.
fn render_triple_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    table: &CountTable,
    palette: ChartPalette,
    colors: &ThemeColors,
) {
    let root = aggregate(table);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    render_partition(frame, rows[0], title, &root, palette.root, colors);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(49),
            Constraint::Percentage(2),
            Constraint::Percentage(49),
        ])
        .split(rows[1]);

    for (slot, bar) in [(0, palette.first), (2, palette.second)] {
        let area = columns[slot];
        let key = root.get(slot / 2).map(|(k, _)| k.as_str());
        match key.map(|k| (k, children(table, k))) {
            Some((key, Ok(data))) => render_partition(frame, area, key, data, bar, colors),
            Some((key, Err(e))) => {
                log::warn!("{} chart: {}", title, e);
                render_message(frame, area, key, &e.to_string(), colors.error, colors);
            }
            None => render_message(frame, area, "", "nothing to split", colors.text_muted, colors),
        }
    }
}

/// Title line, the bar itself, then a wrapped legend.
fn render_partition(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &[(String, u64)],
    bar: BarPalette,
    colors: &ThemeColors,
) {
    if area.height < BAR_HEIGHT + 1 || area.width == 0 {
        return;
    }

    let px = u32::from(area.width) * PX_PER_CELL;
    let segments = match layout_counts(data, px, bar.min_light, bar.max_light) {
        Ok(segments) => segments,
        Err(e) => {
            log::debug!("{} bar: {}", title, e);
            render_message(frame, area, title, &e.to_string(), colors.text_muted, colors);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(BAR_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(title_line(title, colors), chunks[0]);

    let segment_colors: Vec<Color> = segments.iter().map(|s| bar.color(s.lightness)).collect();
    let color_of = |i: Option<usize>| {
        i.and_then(|i| segment_colors.get(i).copied())
            .unwrap_or(colors.bg_primary)
    };
    let bar_line = Line::from(
        bar_cells(&segments, area.width)
            .into_iter()
            .map(|cell| {
                Span::styled(
                    cell.ch.to_string(),
                    Style::default().fg(color_of(cell.fg)).bg(color_of(cell.bg)),
                )
            })
            .collect::<Vec<_>>(),
    );
    let bar_lines = vec![bar_line; BAR_HEIGHT as usize];
    frame.render_widget(Paragraph::new(bar_lines), chunks[1]);

    let mut legend: Vec<Span> = Vec::with_capacity(segments.len() * 3);
    for (seg, color) in segments.iter().zip(&segment_colors) {
        legend.push(Span::styled("■ ", Style::default().fg(*color)));
        legend.push(Span::styled(
            format!("{} {}", seg.label, seg.value),
            Style::default().fg(colors.text_secondary),
        ));
        legend.push(Span::raw("  "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(legend)).wrap(Wrap { trim: true }),
        chunks[2],
    );
}

fn title_line<'a>(title: &str, colors: &ThemeColors) -> Paragraph<'a> {
    Paragraph::new(Line::from(Span::styled(
        title.to_uppercase(),
        Style::default()
            .fg(colors.text_primary)
            .add_modifier(Modifier::BOLD),
    )))
}

fn render_message(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    color: Color,
    colors: &ThemeColors,
) {
    let lines = vec![
        Line::from(Span::styled(
            title.to_uppercase(),
            Style::default()
                .fg(colors.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
