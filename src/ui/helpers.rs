//! Helper functions and shared types for UI rendering

use crate::theme::ThemeColors;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    List,
    Chart,
}

/// Which chart the right panel shows.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChartKind {
    Genre,
    Language,
    PublisherCities,
}

impl ChartKind {
    pub fn next(self) -> Self {
        match self {
            ChartKind::Genre => ChartKind::Language,
            ChartKind::Language => ChartKind::PublisherCities,
            ChartKind::PublisherCities => ChartKind::Genre,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            ChartKind::Genre => " GENRES ",
            ChartKind::Language => " LANGUAGES ",
            ChartKind::PublisherCities => " PUBLISHER CITIES ",
        }
    }
}

/// Cached panel rectangles for mouse hit-testing
/// Updated during render to match exactly what's displayed
#[derive(Default, Clone)]
pub struct PanelRects {
    pub list: Option<Rect>,
    pub chart: Option<Rect>,
}

impl PanelRects {
    #[inline]
    pub fn find_panel(&self, x: u16, y: u16) -> Option<Focus> {
        if Self::contains_point(self.list, x, y) {
            return Some(Focus::List);
        }
        if Self::contains_point(self.chart, x, y) {
            return Some(Focus::Chart);
        }
        None
    }

    #[inline(always)]
    fn contains_point(rect: Option<Rect>, x: u16, y: u16) -> bool {
        rect.is_some_and(|r| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
    }
}

/// Bordered panel with a centered title, highlighted when focused.
pub fn panel_block<'a>(
    title: &'a str,
    hint: &'a str,
    focused: bool,
    colors: &ThemeColors,
) -> Block<'a> {
    let title_color = if focused {
        colors.border_focus
    } else {
        colors.border_default
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(title_color))
        .title(
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(title_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        )
        .title_bottom(
            Line::from(Span::styled(
                if focused { hint } else { " " },
                Style::default().fg(colors.text_muted),
            ))
            .alignment(Alignment::Center),
        )
}

/// Helper: Truncate to a display width, adding an ellipsis if anything was cut.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Helper: Pad with spaces on the right up to a display width.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}
