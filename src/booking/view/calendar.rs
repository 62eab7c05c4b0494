use std::sync::Arc;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction, PickerAction};
use crate::ui::{Component, EventResult};

/// Width of one day cell, including the gap after it.
const CELL_WIDTH: usize = 4;
const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Event emitted by [`DatePicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// The cursor moved to a new date.
    Moved(NaiveDate),
    /// The cursor date was confirmed.
    Confirmed(NaiveDate),
    /// The picker was closed without confirming.
    Dismissed,
}

/// Month grid with a day cursor.
pub struct DatePicker {
    cursor: NaiveDate,
    /// The date currently applied to the selection.
    chosen: NaiveDate,
    resolver: Arc<KeyResolver>,
}

impl DatePicker {
    pub const fn new(date: NaiveDate, resolver: Arc<KeyResolver>) -> Self {
        Self {
            cursor: date,
            chosen: date,
            resolver,
        }
    }

    /// Reset the cursor onto the applied date, e.g. when the picker opens.
    pub const fn open_at(&mut self, date: NaiveDate) {
        self.cursor = date;
        self.chosen = date;
    }

    pub const fn set_chosen(&mut self, date: NaiveDate) {
        self.chosen = date;
    }

    fn move_to(&mut self, date: Option<NaiveDate>) -> EventResult<PickerEvent> {
        match date {
            Some(date) if date != self.cursor => {
                self.cursor = date;
                PickerEvent::Moved(date).into()
            }
            _ => EventResult::Consumed,
        }
    }

    fn month_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        let offset = first.weekday().num_days_from_monday() as usize;
        let today = Local::now().date_naive();

        let mut lines = vec![
            Line::from(Span::styled(
                first.format("%B %Y").to_string(),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(
                WEEKDAYS
                    .iter()
                    .map(|d| Span::styled(format!("{d:>3} "), Style::default().fg(theme.overlay1())))
                    .collect::<Vec<_>>(),
            ),
        ];

        let mut week: Vec<Span<'static>> = vec![Span::raw(" ".repeat(offset * CELL_WIDTH))];
        for day in 1..=days_in_month(first) {
            let Some(date) = first.with_day(day) else {
                break;
            };

            let mut style = Style::default().fg(theme.text());
            if date == today {
                style = style.fg(theme.peach());
            }
            if date == self.chosen {
                style = style.fg(theme.base()).bg(theme.lavender());
            }
            if date == self.cursor {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }

            week.push(Span::styled(format!("{day:>3}"), style));
            week.push(Span::raw(" "));

            if date.weekday().num_days_from_monday() == 6 {
                lines.push(Line::from(std::mem::take(&mut week)));
            }
        }
        if !week.is_empty() {
            lines.push(Line::from(week));
        }

        lines
    }
}

impl Component for DatePicker {
    type Output = PickerEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = Arc::clone(&self.resolver);

        let result = if r.matches_nav(&key, NavAction::Select) {
            PickerEvent::Confirmed(self.cursor).into()
        } else if r.matches_global(&key, GlobalAction::Back) {
            PickerEvent::Dismissed.into()
        } else if r.matches_nav(&key, NavAction::Left) {
            self.move_to(self.cursor.checked_sub_days(Days::new(1)))
        } else if r.matches_nav(&key, NavAction::Right) {
            self.move_to(self.cursor.checked_add_days(Days::new(1)))
        } else if r.matches_nav(&key, NavAction::Up) {
            self.move_to(self.cursor.checked_sub_days(Days::new(7)))
        } else if r.matches_nav(&key, NavAction::Down) {
            self.move_to(self.cursor.checked_add_days(Days::new(7)))
        } else if r.matches_picker(&key, PickerAction::PreviousMonth) {
            self.move_to(self.cursor.checked_sub_months(Months::new(1)))
        } else if r.matches_picker(&key, PickerAction::NextMonth) {
            self.move_to(self.cursor.checked_add_months(Months::new(1)))
        } else if r.matches_picker(&key, PickerAction::Today) {
            self.move_to(Some(Local::now().date_naive()))
        } else {
            EventResult::Ignored
        };
        Ok(result)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Paragraph::new(self.month_lines(theme)), area);
    }
}

/// Number of days in the month containing `date`.
fn days_in_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map_or(28, |last| last.day())
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn picker(date: NaiveDate) -> DatePicker {
        DatePicker::new(date, Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(ymd(2024, 2, 10)), 29);
        assert_eq!(days_in_month(ymd(2023, 2, 1)), 28);
        assert_eq!(days_in_month(ymd(2024, 12, 31)), 31);
        assert_eq!(days_in_month(ymd(2024, 4, 30)), 30);
    }

    #[test]
    fn test_cursor_movement() {
        let mut p = picker(ymd(2024, 5, 31));

        let result = p.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(result, EventResult::Event(PickerEvent::Moved(ymd(2024, 6, 1))));

        p.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(p.cursor, ymd(2024, 5, 25));

        p.handle_key(key(KeyCode::Char('h'))).unwrap();
        assert_eq!(p.cursor, ymd(2024, 5, 24));

        p.handle_key(key(KeyCode::Char(']'))).unwrap();
        assert_eq!(p.cursor, ymd(2024, 6, 24));

        p.handle_key(key(KeyCode::PageUp)).unwrap();
        assert_eq!(p.cursor, ymd(2024, 5, 24));
    }

    #[test]
    fn test_month_jump_clamps_day() {
        let mut p = picker(ymd(2024, 1, 31));
        p.handle_key(key(KeyCode::Char(']'))).unwrap();
        assert_eq!(p.cursor, ymd(2024, 2, 29));
    }

    #[test]
    fn test_confirm_and_dismiss() {
        let mut p = picker(ymd(2024, 5, 10));
        p.handle_key(key(KeyCode::Down)).unwrap();

        let result = p.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(result, EventResult::Event(PickerEvent::Confirmed(ymd(2024, 5, 17))));

        let result = p.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(result, EventResult::Event(PickerEvent::Dismissed));
    }

    #[test]
    fn test_open_at_resets_cursor() {
        let mut p = picker(ymd(2024, 5, 10));
        p.handle_key(key(KeyCode::Right)).unwrap();
        p.open_at(ymd(2024, 7, 1));
        assert_eq!(p.cursor, ymd(2024, 7, 1));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut p = picker(ymd(2024, 5, 10));
        assert_eq!(p.handle_key(key(KeyCode::Char('x'))).unwrap(), EventResult::Ignored);
        assert_eq!(p.cursor, ymd(2024, 5, 10));
    }

    #[test]
    fn test_month_grid_has_every_day() {
        let p = picker(ymd(2024, 5, 10));
        let lines = p.month_lines(&Theme::default());
        let text: String = lines[2..]
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for day in 1..=31 {
            assert!(text.contains(&format!("{day:>3}")));
        }
        // 2024-05-01 is a Wednesday: two blank cells before it
        assert!(lines[2].spans[0].content.len() == 2 * CELL_WIDTH);
    }
}
