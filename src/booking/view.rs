//! Presentation of the booking screen.
//!
//! The screen hands a fresh [`ViewModel`] to [`BookingView::sync`] before
//! every key and frame. The view turns keys into [`BookingMsg`]s and never
//! touches the selection itself.

mod calendar;
mod hours;
mod providers;

use std::sync::Arc;

use chrono::NaiveDate;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::api::Provider;
use crate::booking::message::BookingMsg;
use crate::booking::model::{FormattedSlot, format_hour};
use crate::booking::selection::PickerStyle;
use crate::config::{
    BookingAction, GlobalAction, KeyResolver, NavAction, PickerAction, SearchAction,
};
use crate::ui::{Component, EventResult, Keybinding, Spinner};

pub use calendar::{DatePicker, PickerEvent};
pub use hours::HourGrid;
pub use providers::{ProviderList, ProviderListEvent};

/// A provider row and whether it is the chosen one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderItem {
    pub provider: Provider,
    pub selected: bool,
}

/// An hour button and whether it is the chosen one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotItem {
    pub slot: FormattedSlot,
    pub selected: bool,
}

/// Everything the view needs for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub providers: Vec<ProviderItem>,
    pub providers_loading: bool,
    pub providers_error: Option<String>,
    pub date: NaiveDate,
    pub date_picker_visible: bool,
    pub picker_style: PickerStyle,
    pub hour: Option<u8>,
    pub morning: Vec<SlotItem>,
    pub afternoon: Vec<SlotItem>,
    pub availability_loading: bool,
    pub availability_error: Option<String>,
}

impl ViewModel {
    /// Name of the chosen provider, if it is in the directory.
    pub fn provider_name(&self) -> Option<&str> {
        self.providers
            .iter()
            .find(|item| item.selected)
            .map(|item| item.provider.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Providers,
    Calendar,
    Hours,
}

impl Pane {
    const fn next(self) -> Self {
        match self {
            Self::Providers => Self::Calendar,
            Self::Calendar => Self::Hours,
            Self::Hours => Self::Providers,
        }
    }
}

pub struct BookingView {
    state: ViewModel,
    focus: Pane,
    providers: ProviderList,
    picker: DatePicker,
    hours: HourGrid,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl BookingView {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        let state = ViewModel::default();
        Self {
            focus: Pane::default(),
            providers: ProviderList::new(resolver.clone()),
            picker: DatePicker::new(state.date, resolver.clone()),
            hours: HourGrid::new(resolver.clone()),
            spinner: Spinner::new().with_label("Loading providers..."),
            resolver,
            state,
        }
    }

    pub fn sync(&mut self, state: ViewModel) {
        if self.state == state {
            return;
        }
        self.providers.set_items(state.providers.clone());
        self.hours
            .set_slots(state.morning.clone(), state.afternoon.clone());
        self.picker.set_chosen(state.date);
        self.state = state;
    }

    /// Open the picker on the applied date and focus the calendar.
    pub fn open_picker(&mut self, date: NaiveDate) {
        self.picker.open_at(date);
        self.set_focus(Pane::Calendar);
    }

    fn set_focus(&mut self, pane: Pane) {
        self.focus = pane;
        self.hours.set_focused(pane == Pane::Hours);
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<EventResult<BookingMsg>> {
        if self
            .resolver
            .matches_booking(&key, BookingAction::ToggleDatePicker)
        {
            return Ok(BookingMsg::ToggleDatePicker.into());
        }

        let auto_dismiss = self.state.picker_style == PickerStyle::AutoDismiss;
        let result = match self.picker.handle_key(key)? {
            // Auto-dismiss pickers only report the final choice
            EventResult::Event(PickerEvent::Moved(_)) if auto_dismiss => EventResult::Consumed,
            EventResult::Event(PickerEvent::Moved(date)) => BookingMsg::DateChanged(Some(date)).into(),
            EventResult::Event(PickerEvent::Confirmed(date)) if auto_dismiss => {
                BookingMsg::DateChanged(Some(date)).into()
            }
            EventResult::Event(PickerEvent::Dismissed) if auto_dismiss => {
                BookingMsg::DateChanged(None).into()
            }
            EventResult::Event(PickerEvent::Confirmed(_) | PickerEvent::Dismissed) => {
                BookingMsg::ToggleDatePicker.into()
            }
            EventResult::Consumed => EventResult::Consumed,
            // The open picker swallows everything except quitting
            EventResult::Ignored if self.resolver.matches_global(&key, GlobalAction::Quit) => {
                EventResult::Ignored
            }
            EventResult::Ignored => EventResult::Consumed,
        };
        Ok(result)
    }

    /// Keybindings for the status bar in the current state.
    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;

        if self.state.date_picker_visible {
            let confirm = if self.state.picker_style == PickerStyle::AutoDismiss {
                "Pick date"
            } else {
                "Done"
            };
            return vec![
                Keybinding::new(
                    format!("{} {}", r.display_nav(NavAction::Left), r.display_nav(NavAction::Right)),
                    "Day",
                ),
                Keybinding::new(
                    format!("{} {}", r.display_nav(NavAction::Up), r.display_nav(NavAction::Down)),
                    "Week",
                ),
                Keybinding::new(
                    format!(
                        "{} {}",
                        r.display_picker(PickerAction::PreviousMonth),
                        r.display_picker(PickerAction::NextMonth)
                    ),
                    "Month",
                ),
                Keybinding::new(r.display_picker(PickerAction::Today), "Today"),
                Keybinding::new(r.display_nav(NavAction::Select), confirm),
            ];
        }

        if self.providers.is_searching() {
            return vec![
                Keybinding::new(r.display_nav(NavAction::Select), "Apply filter"),
                Keybinding::new(r.display_search(SearchAction::Exit), "Clear filter"),
            ];
        }

        let mut bindings = match self.focus {
            Pane::Providers => vec![
                Keybinding::new(
                    format!("{} {}", r.display_nav(NavAction::Up), r.display_nav(NavAction::Down)),
                    "Move",
                ),
                Keybinding::new(r.display_nav(NavAction::Select), "Choose provider"),
                Keybinding::new(r.display_search(SearchAction::Toggle), "Filter"),
            ],
            Pane::Calendar => vec![Keybinding::new(r.display_nav(NavAction::Select), "Open calendar")],
            Pane::Hours => vec![
                Keybinding::new(
                    format!("{} {}", r.display_nav(NavAction::Left), r.display_nav(NavAction::Right)),
                    "Move",
                ),
                Keybinding::new(r.display_nav(NavAction::Select), "Choose hour"),
            ],
        };
        bindings.push(Keybinding::new(
            r.display_booking(BookingAction::ToggleDatePicker),
            "Date picker",
        ));
        bindings
    }

    fn pane_block(&self, title: String, pane: Pane, theme: &Theme) -> Block<'static> {
        let border = if self.focus == pane {
            theme.border_focused()
        } else {
            theme.border()
        };
        Block::default()
            .title(Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dim = Style::default().fg(theme.subtext0());
        let value = Style::default()
            .fg(theme.text())
            .add_modifier(Modifier::BOLD);

        let hour = self
            .state
            .hour
            .map_or_else(|| "--:--".to_string(), format_hour);
        let provider = self.state.provider_name().unwrap_or("unknown provider");

        let line = Line::from(vec![
            Span::styled("Booking with ", dim),
            Span::styled(provider.to_string(), value),
            Span::styled(" on ", dim),
            Span::styled(self.state.date.format("%A, %d %B %Y").to_string(), value),
            Span::styled(" at ", dim),
            Span::styled(hour, Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_providers(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = self.pane_block("Providers".to_string(), Pane::Providers, theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.state.providers_loading && self.state.providers.is_empty() {
            self.spinner.render(frame, inner, theme);
            return;
        }
        if let (Some(error), true) = (&self.state.providers_error, self.state.providers.is_empty()) {
            frame.render_widget(
                Paragraph::new(format!("Could not load providers: {error}"))
                    .style(Style::default().fg(theme.error()))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        self.providers.render(frame, inner, theme);
    }

    fn render_calendar(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = self.pane_block("Date".to_string(), Pane::Calendar, theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.state.date_picker_visible {
            self.picker.render(frame, inner, theme);
            return;
        }

        let hint = format!(
            "{} to change",
            self.resolver.display_booking(BookingAction::ToggleDatePicker)
        );
        let lines = vec![
            Line::from(Span::styled(
                self.state.date.format("%d/%m/%Y").to_string(),
                Style::default()
                    .fg(theme.text())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, Style::default().fg(theme.overlay1()))),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_hours(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = if self.state.availability_loading {
            "Hours (loading...)".to_string()
        } else {
            "Hours".to_string()
        };
        let block = self.pane_block(title, Pane::Hours, theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [error_area, grid_area] = Layout::vertical([
            Constraint::Length(u16::from(self.state.availability_error.is_some())),
            Constraint::Min(1),
        ])
        .areas(inner);

        if let Some(error) = &self.state.availability_error {
            frame.render_widget(
                Paragraph::new(format!("Could not refresh hours: {error}"))
                    .style(Style::default().fg(theme.error())),
                error_area,
            );
        }
        self.hours.render(frame, grid_area, theme);
    }
}

impl Component for BookingView {
    type Output = BookingMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.state.date_picker_visible {
            return self.handle_picker_key(key);
        }

        if self.providers.is_searching() {
            let result = self.providers.handle_key(key)?;
            return Ok(result.map(|ProviderListEvent::Activated(id)| BookingMsg::SelectProvider(id)));
        }

        if self.resolver.matches_global(&key, GlobalAction::FocusNext) {
            self.set_focus(self.focus.next());
            return Ok(EventResult::Consumed);
        }
        if self
            .resolver
            .matches_booking(&key, BookingAction::ToggleDatePicker)
        {
            return Ok(BookingMsg::ToggleDatePicker.into());
        }

        let result = match self.focus {
            Pane::Providers => self
                .providers
                .handle_key(key)?
                .map(|ProviderListEvent::Activated(id)| BookingMsg::SelectProvider(id)),
            Pane::Calendar if self.resolver.matches_nav(&key, NavAction::Select) => {
                BookingMsg::ToggleDatePicker.into()
            }
            Pane::Calendar => EventResult::Ignored,
            Pane::Hours => self.hours.handle_key(key)?.map(BookingMsg::SelectHour),
        };
        if result.is_consumed() {
            return Ok(result);
        }

        if self.resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(BookingMsg::Close.into());
        }
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {
        if self.state.providers_loading {
            self.spinner.on_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [summary_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        self.render_summary(frame, summary_area, theme);

        let [providers_area, right_area] =
            Layout::horizontal([Constraint::Percentage(35), Constraint::Min(30)]).areas(body_area);
        let calendar_height = if self.state.date_picker_visible { 10 } else { 4 };
        let [calendar_area, hours_area] =
            Layout::vertical([Constraint::Length(calendar_height), Constraint::Min(6)])
                .areas(right_area);

        self.render_providers(frame, providers_area, theme);
        self.render_calendar(frame, calendar_area, theme);
        self.render_hours(frame, hours_area, theme);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::booking::fake::{day, provider};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state(picker_style: PickerStyle, date_picker_visible: bool) -> ViewModel {
        ViewModel {
            providers: vec![
                ProviderItem {
                    provider: provider("p1"),
                    selected: true,
                },
                ProviderItem {
                    provider: provider("p2"),
                    selected: false,
                },
            ],
            providers_loading: false,
            providers_error: None,
            date: day(10),
            date_picker_visible,
            picker_style,
            hour: None,
            morning: Vec::new(),
            afternoon: Vec::new(),
            availability_loading: false,
            availability_error: None,
        }
    }

    fn view(picker_style: PickerStyle, date_picker_visible: bool) -> BookingView {
        let mut view = BookingView::new(Arc::new(KeyResolver::default()));
        view.open_picker(day(10));
        view.set_focus(Pane::Providers);
        view.sync(state(picker_style, date_picker_visible));
        view
    }

    fn msg(result: EventResult<BookingMsg>) -> BookingMsg {
        match result {
            EventResult::Event(msg) => msg,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_selection_emits_message() {
        let mut view = view(PickerStyle::AutoDismiss, false);
        view.handle_key(key(KeyCode::Down)).unwrap();
        let result = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(msg(result), BookingMsg::SelectProvider(id) if id == "p2"));
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut view = view(PickerStyle::AutoDismiss, false);
        assert_eq!(view.focus, Pane::Providers);
        view.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(view.focus, Pane::Calendar);
        view.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(view.focus, Pane::Hours);
        view.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(view.focus, Pane::Providers);
    }

    #[test]
    fn test_toggle_key_and_back() {
        let mut view = view(PickerStyle::AutoDismiss, false);
        let result = view.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(msg(result), BookingMsg::ToggleDatePicker));

        let result = view.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(matches!(msg(result), BookingMsg::Close));

        assert_eq!(view.handle_key(key(KeyCode::Char('q'))).unwrap(), EventResult::Ignored);
    }

    #[test]
    fn test_auto_dismiss_picker_reports_final_choice() {
        let mut view = view(PickerStyle::AutoDismiss, true);
        assert_eq!(view.handle_key(key(KeyCode::Right)).unwrap(), EventResult::Consumed);

        let result = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(msg(result), BookingMsg::DateChanged(Some(d)) if d == day(11)));

        let result = view.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(matches!(msg(result), BookingMsg::DateChanged(None)));
    }

    #[test]
    fn test_explicit_picker_reports_every_move() {
        let mut view = view(PickerStyle::Explicit, true);
        let result = view.handle_key(key(KeyCode::Down)).unwrap();
        assert!(matches!(msg(result), BookingMsg::DateChanged(Some(d)) if d == day(17)));

        let result = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(msg(result), BookingMsg::ToggleDatePicker));
    }

    #[test]
    fn test_open_picker_swallows_other_keys() {
        let mut view = view(PickerStyle::AutoDismiss, true);
        assert_eq!(view.handle_key(key(KeyCode::Tab)).unwrap(), EventResult::Consumed);
        assert_eq!(view.focus, Pane::Providers);
        assert_eq!(view.handle_key(key(KeyCode::Char('q'))).unwrap(), EventResult::Ignored);
    }

    #[test]
    fn test_provider_cursor_survives_resync() {
        let mut view = view(PickerStyle::AutoDismiss, false);
        for _ in 0..3 {
            view.handle_key(key(KeyCode::Down)).unwrap();
            view.sync(state(PickerStyle::AutoDismiss, false));
        }
        let result = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(msg(result), BookingMsg::SelectProvider(id) if id == "p2"));
    }

    #[test]
    fn test_sync_skips_unchanged_state() {
        let mut view = view(PickerStyle::AutoDismiss, false);
        view.handle_key(key(KeyCode::Down)).unwrap();

        // Same snapshot again leaves the list untouched
        view.sync(state(PickerStyle::AutoDismiss, false));
        assert_eq!(view.providers.highlighted().unwrap().provider.id, "p2");

        let mut changed = state(PickerStyle::AutoDismiss, false);
        changed.providers.truncate(1);
        view.sync(changed.clone());
        assert_eq!(view.state, changed);
        assert_eq!(view.providers.highlighted().unwrap().provider.id, "p1");
    }

    #[test]
    fn test_keybindings_follow_state() {
        let closed = view(PickerStyle::AutoDismiss, false);
        assert!(closed.keybindings().iter().any(|kb| kb.description == "Choose provider"));

        let open = view(PickerStyle::Explicit, true);
        assert!(open.keybindings().iter().any(|kb| kb.description == "Done"));
    }
}
