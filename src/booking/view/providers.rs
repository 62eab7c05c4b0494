use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::Theme;
use crate::booking::view::ProviderItem;
use crate::config::{KeyResolver, NavAction, SearchAction};
use crate::search::Matcher;
use crate::ui::{Component, EventResult};

/// Event emitted by [`ProviderList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderListEvent {
    /// A provider row was activated.
    Activated(String),
}

/// Selectable provider list with an inline fuzzy filter.
pub struct ProviderList {
    items: Vec<ProviderItem>,
    /// Indices into `items` that pass the filter.
    visible: Vec<usize>,
    state: ListState,
    query: String,
    searching: bool,
    resolver: Arc<KeyResolver>,
}

impl ProviderList {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            state: ListState::default(),
            query: String::new(),
            searching: false,
            resolver,
        }
    }

    pub fn set_items(&mut self, items: Vec<ProviderItem>) {
        if self.items == items {
            return;
        }
        let previous = self.highlighted_id();
        self.items = items;
        self.apply_filter(previous);
    }

    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// The provider under the cursor.
    pub fn highlighted(&self) -> Option<&ProviderItem> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .and_then(|&i| self.items.get(i))
    }

    /// Move the cursor onto a provider if it is visible.
    pub fn highlight(&mut self, provider_id: &str) {
        if let Some(pos) = self
            .visible
            .iter()
            .position(|&i| self.items[i].provider.id == provider_id)
        {
            self.state.select(Some(pos));
        }
    }

    /// Move the cursor, staying on the visible rows.
    fn step(&mut self, delta: isize) {
        let Some(last) = self.visible.len().checked_sub(1) else {
            return;
        };
        let next = self
            .state
            .selected()
            .map_or(0, |i| i.saturating_add_signed(delta).min(last));
        self.state.select(Some(next));
    }

    fn highlighted_id(&self) -> Option<String> {
        self.highlighted().map(|item| item.provider.id.clone())
    }

    /// Recompute the visible rows, keeping the cursor on `previous` if it
    /// is still visible.
    fn apply_filter(&mut self, previous: Option<String>) {

        let matcher = Matcher::new();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                matcher.matches(&item.provider.name, &self.query)
                    || matcher.matches(&item.provider.id, &self.query)
            })
            .map(|(i, _)| i)
            .collect();

        if self.visible.is_empty() {
            self.state.select(None);
            return;
        }

        match previous {
            Some(id) if self.visible.iter().any(|&i| self.items[i].provider.id == id) => {
                self.highlight(&id);
            }
            _ => {
                // Default to the selected provider, then to the first row
                let selected = self.visible.iter().position(|&i| self.items[i].selected);
                self.state.select(Some(selected.unwrap_or(0)));
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> EventResult<ProviderListEvent> {
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.searching = false;
            self.query.clear();
            self.apply_filter(self.highlighted_id());
            return EventResult::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            self.searching = false;
            return EventResult::Consumed;
        }

        match key.code {
            KeyCode::Backspace => {
                self.query.pop();
                self.apply_filter(self.highlighted_id());
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.apply_filter(self.highlighted_id());
            }
            _ => {}
        }
        EventResult::Consumed
    }

    fn render_row(item: &ProviderItem, theme: &Theme) -> ListItem<'static> {
        let (marker, name_style) = if item.selected {
            (
                "● ",
                Style::default()
                    .fg(theme.peach())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default().fg(theme.text()))
        };

        ListItem::new(vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.peach())),
                Span::styled(item.provider.name.clone(), name_style),
            ]),
            Line::from(Span::styled(
                format!("  {}", item.provider.avatar_url),
                Style::default().fg(theme.overlay0()),
            )),
        ])
    }
}

impl Component for ProviderList {
    type Output = ProviderListEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.searching {
            return Ok(self.handle_search_key(key));
        }

        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
            return Ok(EventResult::Consumed);
        }

        let result = if self.resolver.matches_nav(&key, NavAction::Down) {
            self.step(1);
            EventResult::Consumed
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.step(-1);
            EventResult::Consumed
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            self.highlighted().map_or(EventResult::Ignored, |item| {
                ProviderListEvent::Activated(item.provider.id.clone()).into()
            })
        } else {
            EventResult::Ignored
        };
        Ok(result)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_filter = self.searching || !self.query.is_empty();
        let [list_area, filter_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(u16::from(show_filter)),
        ])
        .areas(area);

        if self.visible.is_empty() {
            let text = if self.items.is_empty() {
                "No providers"
            } else {
                "No matches"
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(theme.overlay0())),
                list_area,
            );
        } else {
            let rows: Vec<ListItem> = self
                .visible
                .iter()
                .map(|&i| Self::render_row(&self.items[i], theme))
                .collect();

            let list = List::new(rows)
                .highlight_style(Style::default().bg(theme.selection_bg()))
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, list_area, &mut self.state);
        }

        if show_filter {
            let cursor = if self.searching { "▏" } else { "" };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("/", Style::default().fg(theme.peach())),
                    Span::styled(format!("{}{cursor}", self.query), Style::default().fg(theme.text())),
                ])),
                filter_area,
            );
        }
    }
}
