//! Terminal dashboard: the classified reading list on the left, charts and
//! entry details on the right.

mod chart_panel;
mod helpers;
mod list_panel;

use crate::classify::{classify, Policy};
use crate::counts::{count_table, tally, CountTable};
use crate::data::Dataset;
use crate::describe::city_text;
use crate::render::{render_groups, RenderedNode};
use crate::theme::Theme;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use fxhash::FxHashMap;
use helpers::{ChartKind, Focus, PanelRects};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use std::io;

/// One line of the reading list panel.
#[derive(Debug, Clone, PartialEq)]
enum Row {
    Header {
        label: String,
        level: usize,
        count: usize,
    },
    /// `index` points into the reading list.
    Entry { index: usize, level: usize },
}

pub struct App {
    data: Dataset,
    theme: Theme,
    policy: Policy,

    rows: Vec<Row>,
    list_state: ListState,
    cached_items: Vec<ListItem<'static>>,
    cached_width: u16,
    list_error: Option<String>,
    /// Startup problem shown in the status bar until the next policy switch.
    notice: Option<String>,

    genre_table: CountTable,
    language_table: CountTable,
    publisher_cities: Vec<(String, u64)>,
    chart: ChartKind,
    chart_scroll: usize,
    chart_max_scroll: usize,

    show_detail: bool,
    focus: Focus,
    cached_rects: PanelRects,
    terminal_size: Rect,
    exit: bool,
    should_redraw: bool,
}

impl App {
    pub fn new(data: Dataset, policy: Policy) -> Self {
        let entries = &data.reading_list.entries;

        // Charts fall back to tables derived from the reading list itself.
        let genre_table = data.genre_counts.clone().unwrap_or_else(|| {
            derived_table(entries, Policy::Genre)
        });
        let language_table = data.language_counts.clone().unwrap_or_else(|| {
            derived_table(entries, Policy::Language)
        });
        let publisher_cities = data.publisher_cities.clone().unwrap_or_else(|| {
            tally(entries.iter().map(|e| city_text(&e.book.publisher.city)))
        });

        let mut app = Self {
            data,
            theme: Theme,
            policy,
            rows: Vec::new(),
            list_state: ListState::default(),
            cached_items: Vec::new(),
            cached_width: 0,
            list_error: None,
            notice: None,
            genre_table,
            language_table,
            publisher_cities,
            chart: ChartKind::Genre,
            chart_scroll: 0,
            chart_max_scroll: 0,
            show_detail: false,
            focus: Focus::List,
            cached_rects: PanelRects::default(),
            terminal_size: Rect::default(),
            exit: false,
            should_redraw: true,
        };
        app.rebuild_rows();
        app
    }

    /// Reclassify under the current policy and reset the selection.
    fn rebuild_rows(&mut self) {
        let index: FxHashMap<u64, usize> = self
            .data
            .reading_list
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();

        match classify(&self.data.reading_list.entries, self.policy) {
            Ok(tree) => {
                self.rows = render_groups(&tree)
                    .into_iter()
                    .filter_map(|node| match node {
                        RenderedNode::Header {
                            label,
                            level,
                            count,
                        } => Some(Row::Header {
                            label,
                            level,
                            count,
                        }),
                        RenderedNode::Entry { entry, level } => index
                            .get(&entry.id)
                            .map(|&index| Row::Entry { index, level }),
                    })
                    .collect();
                self.list_error = None;
                log::info!("showing {} rows sorted by {}", self.rows.len(), self.policy);
            }
            Err(e) => {
                log::error!("sorting by {} failed: {}", self.policy, e);
                self.rows.clear();
                self.list_error = Some(e.to_string());
            }
        }

        self.cached_items.clear();
        self.show_detail = false;
        self.list_state = ListState::default();
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    fn set_policy(&mut self, policy: Policy) {
        self.notice = None;
        if policy != self.policy {
            self.policy = policy;
            self.rebuild_rows();
        }
    }

    /// Reading-list index of the selected row, if it is an entry.
    fn selected_entry(&self) -> Option<usize> {
        match self.rows.get(self.list_state.selected()?)? {
            Row::Entry { index, .. } => Some(*index),
            Row::Header { .. } => None,
        }
    }

    fn scroll_list(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        self.list_state
            .select(Some((current + delta).clamp(0, last) as usize));
    }

    fn scroll_chart(&mut self, delta: isize) {
        let next = (self.chart_scroll as isize + delta).clamp(0, self.chart_max_scroll as isize);
        self.chart_scroll = next as usize;
    }

    fn scroll_focused(&mut self, delta: isize) {
        match self.focus {
            Focus::List => self.scroll_list(delta),
            Focus::Chart => self.scroll_chart(delta),
        }
    }

    fn page_size(&self) -> isize {
        (self.terminal_size.height.saturating_sub(6) as isize).max(1)
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<()> {
        self.should_redraw = true;
        let size = terminal.size()?;
        self.terminal_size = Rect::new(0, 0, size.width, size.height);

        while !self.exit {
            if event::poll(std::time::Duration::from_millis(30))? {
                while event::poll(std::time::Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) => {
                            if key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                                self.should_redraw = true;
                                if self.exit {
                                    return Ok(());
                                }
                            }
                        }
                        Event::Resize(w, h) => {
                            self.terminal_size = Rect::new(0, 0, w, h);
                            self.should_redraw = true;
                        }
                        Event::Mouse(mouse) => {
                            if self.handle_mouse_event(mouse) {
                                self.should_redraw = true;
                            }
                        }
                        Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
                    }
                }
            }

            if self.should_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.should_redraw = false;
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_detail {
                    self.show_detail = false;
                } else {
                    self.exit = true;
                }
            }
            KeyCode::Char(c @ '1'..='7') => {
                let i = c as usize - '1' as usize;
                self.set_policy(Policy::ALL[i]);
            }
            KeyCode::Tab => self.set_policy(self.policy.next()),
            KeyCode::BackTab => self.set_policy(self.policy.previous()),
            KeyCode::Left | KeyCode::Char('h') => self.focus = Focus::List,
            KeyCode::Right | KeyCode::Char('l') => self.focus = Focus::Chart,
            KeyCode::Up | KeyCode::Char('k') => self.scroll_focused(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_focused(1),
            KeyCode::PageUp => self.scroll_focused(-self.page_size()),
            KeyCode::PageDown => self.scroll_focused(self.page_size()),
            KeyCode::Home => self.scroll_focused(isize::MIN / 2),
            KeyCode::End => self.scroll_focused(isize::MAX / 2),
            KeyCode::Enter => {
                if self.selected_entry().is_some() {
                    self.show_detail = !self.show_detail;
                }
            }
            KeyCode::Char('c') => {
                self.chart = self.chart.next();
                self.chart_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> bool {
        let (x, y) = (mouse.column, mouse.row);
        let Some(panel) = self.cached_rects.find_panel(x, y) else {
            return false;
        };

        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let delta = if mouse.kind == MouseEventKind::ScrollUp {
                    -1
                } else {
                    1
                };
                match panel {
                    Focus::List => self.scroll_list(delta),
                    Focus::Chart => self.scroll_chart(delta),
                }
                true
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.focus = panel;
                if panel == Focus::List {
                    if let Some(rect) = self.cached_rects.list {
                        // Rows start one line below the top border.
                        let row = y.saturating_sub(rect.y + 1) as usize + self.list_state.offset();
                        if y > rect.y && row < self.rows.len() {
                            self.list_state.select(Some(row));
                        }
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(48), Constraint::Percentage(52)])
            .split(main_chunks[1]);

        self.cached_rects = PanelRects {
            list: Some(horizontal_chunks[0]),
            chart: Some(horizontal_chunks[1]),
        };

        self.render_policy_tabs(frame, main_chunks[0]);
        self.render_list_panel(frame, horizontal_chunks[0]);
        self.render_right_panel(frame, horizontal_chunks[1]);
        self.render_status_bar(frame, main_chunks[2]);
    }

    fn render_policy_tabs(&self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let titles: Vec<String> = Policy::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {}", i + 1, p.name()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.policy.index())
            .style(Style::default().fg(colors.text_muted))
            .highlight_style(
                Style::default()
                    .fg(colors.border_focus)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(Span::styled("│", Style::default().fg(colors.border_default)));
        frame.render_widget(tabs, area);
    }

    fn render_right_panel(&mut self, frame: &mut Frame, area: Rect) {
        let detail = if self.show_detail {
            self.selected_entry()
        } else {
            None
        };

        let constraints = match detail {
            Some(_) => vec![
                Constraint::Min(8),
                Constraint::Length(14),
                Constraint::Length(1),
            ],
            None => vec![Constraint::Min(0), Constraint::Length(1)],
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.cached_rects.chart = Some(chunks[0]);
        self.render_chart_panel(frame, chunks[0]);
        if let Some(index) = detail {
            self.render_entry_detail(frame, chunks[1], index);
        }
        self.render_completion_key(frame, chunks[chunks.len() - 1]);
    }

    fn render_completion_key(&self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let key = Line::from(vec![
            Span::styled("█ ", Style::default().fg(colors.completed)),
            Span::styled("finished", Style::default().fg(colors.completed)),
            Span::raw("   "),
            Span::styled("█ ", Style::default().fg(colors.not_completed)),
            Span::styled(
                "not finished",
                Style::default()
                    .fg(colors.not_completed)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);
        frame.render_widget(Paragraph::new(key).alignment(Alignment::Center), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let status_bar = Paragraph::new(self.status_line())
            .style(Style::default().bg(colors.bg_tertiary))
            .alignment(Alignment::Center);
        frame.render_widget(status_bar, area);
    }

    fn status_line(&self) -> Line<'static> {
        let colors = self.theme.colors();
        let k = Style::default()
            .fg(colors.text_secondary)
            .add_modifier(Modifier::BOLD);
        let t = Style::default().fg(colors.text_muted);
        let sep = Span::styled(" │ ", Style::default().fg(colors.bg_highlight));

        let mut spans: Vec<Span> = Vec::with_capacity(22);
        if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                format!("⚠ {}", notice),
                Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
            ));
            spans.push(sep.clone());
        }
        spans.extend_from_slice(&[
            Span::styled("1-7/Tab", k),
            Span::styled(" sort", t),
            sep.clone(),
            Span::styled("↑↓", k),
            Span::styled(" navigate", t),
            sep.clone(),
            Span::styled("←→/Click", k),
            Span::styled(" focus", t),
        ]);
        if self.selected_entry().is_some() {
            spans.extend_from_slice(&[
                sep.clone(),
                Span::styled("Enter", k),
                Span::styled(if self.show_detail { " hide" } else { " details" }, t),
            ]);
        }
        spans.extend_from_slice(&[
            sep.clone(),
            Span::styled("c", k),
            Span::styled(" chart", t),
            sep,
            Span::styled("Esc/q", k),
            Span::styled(if self.show_detail { " close" } else { " quit" }, t),
        ]);

        Line::from(spans)
    }
}

/// Two-level count table computed from the entries when no export exists.
fn derived_table(entries: &[crate::model::Entry], policy: Policy) -> CountTable {
    match classify(entries, policy) {
        Ok(tree) => count_table(&tree),
        Err(e) => {
            log::warn!("no {} chart: {}", policy, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, entry, with_rating};
    use crate::model::ReadingList;

    fn app(entries: Vec<crate::model::Entry>) -> App {
        let data = Dataset {
            reading_list: ReadingList { entries },
            ..Dataset::default()
        };
        App::new(data, Policy::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_rows_follow_policy() {
        let mut app = app(fixtures::sample());
        assert!(matches!(app.rows[0], Row::Header { ref label, level: 0, .. } if label == "2021"));

        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.policy, Policy::Rating);
        assert!(matches!(app.rows[0], Row::Header { ref label, count: 1, .. } if label == "★★★★★"));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.policy, Policy::DateRead);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.policy, Policy::Rating);
    }

    #[test]
    fn test_every_entry_gets_a_row() {
        let app = app(fixtures::sample());
        let entries = app
            .rows
            .iter()
            .filter(|r| matches!(r, Row::Entry { .. }))
            .count();
        assert_eq!(entries, 8);
    }

    #[test]
    fn test_detail_toggles_only_on_entries() {
        let mut app = app(vec![entry(1, "2021-01-01")]);
        press(&mut app, KeyCode::Enter);
        assert!(!app.show_detail, "first row is a year heading");

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_entry(), Some(0));
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail);

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_detail);
        assert!(!app.exit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.exit);
    }

    #[test]
    fn test_classification_error_is_kept_for_display() {
        let mut app = app(vec![with_rating(entry(1, "2021-01-01"), 9)]);
        assert!(app.list_error.is_none());
        press(&mut app, KeyCode::Char('7'));
        assert!(app.rows.is_empty());
        assert_eq!(
            app.list_error.as_deref(),
            Some("rating must be between 0 and 5, got 9")
        );
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_charts_fall_back_to_reading_list() {
        let app = app(fixtures::sample());
        assert!(!app.genre_table.is_empty());
        assert!(!app.language_table.is_empty());
        let total: u64 = app.publisher_cities.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_startup_notice_shows_until_policy_switch() {
        let config = crate::config::Config {
            policy_name: Some("author".into()),
            ..crate::config::Config::from_lookup(|_| None)
        };
        let err = config.initial_policy().unwrap_err();
        let mut app = app(fixtures::sample()).with_notice(Some(err.to_string()));

        let text: String = app
            .status_line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.starts_with("⚠ invalid sort policy: \"author\""), "{}", text);

        press(&mut app, KeyCode::Char('5'));
        let text: String = app
            .status_line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(!text.contains("author"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app(fixtures::sample());
        press(&mut app, KeyCode::Up);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.list_state.selected(), Some(app.rows.len() - 1));
    }
}
