use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::booking::view::SlotItem;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult};

/// Width of a rendered slot button, including the gap after it.
const SLOT_WIDTH: u16 = 8;

/// Morning and afternoon hour buttons with a cursor.
///
/// Emits the hour when an available slot is activated. Unavailable slots
/// can be reached by the cursor but never emitted.
pub struct HourGrid {
    morning: Vec<SlotItem>,
    afternoon: Vec<SlotItem>,
    cursor: usize,
    /// Slots per row, taken from the last render.
    columns: usize,
    focused: bool,
    resolver: Arc<KeyResolver>,
}

impl HourGrid {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            morning: Vec::new(),
            afternoon: Vec::new(),
            cursor: 0,
            columns: 6,
            focused: false,
            resolver,
        }
    }

    pub fn set_slots(&mut self, morning: Vec<SlotItem>, afternoon: Vec<SlotItem>) {
        self.morning = morning;
        self.afternoon = afternoon;
        self.cursor = self.cursor.min(self.len().saturating_sub(1));
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len()
    }

    fn slot_at(&self, index: usize) -> Option<&SlotItem> {
        self.morning
            .get(index)
            .or_else(|| self.afternoon.get(index.checked_sub(self.morning.len())?))
    }

    /// Slot under the cursor.
    pub fn highlighted(&self) -> Option<&SlotItem> {
        self.slot_at(self.cursor)
    }

    fn step(&mut self, delta: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let max = len - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    fn rows(&self, slots: usize) -> usize {
        slots.div_ceil(self.columns)
    }

    /// Rendered row and column of a slot. Afternoon rows follow the morning ones.
    fn position(&self, index: usize) -> (usize, usize) {
        let morning = self.morning.len();
        if index < morning {
            (index / self.columns, index % self.columns)
        } else {
            let local = index - morning;
            (self.rows(morning) + local / self.columns, local % self.columns)
        }
    }

    /// Slot at a rendered row, clamped to the row's last column.
    fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        let morning_rows = self.rows(self.morning.len());
        let (offset, len, local_row) = if row < morning_rows {
            (0, self.morning.len(), row)
        } else {
            (self.morning.len(), self.afternoon.len(), row - morning_rows)
        };

        let start = local_row * self.columns;
        if start >= len {
            return None;
        }
        let last = (start + self.columns).min(len) - 1;
        Some(offset + (start + col).min(last))
    }

    fn step_row(&mut self, up: bool) {
        if self.len() == 0 {
            return;
        }
        let (row, col) = self.position(self.cursor);
        let target = if up { row.checked_sub(1) } else { Some(row + 1) };
        if let Some(index) = target.and_then(|row| self.index_at(row, col)) {
            self.cursor = index;
        }
    }

    fn section_lines(
        &self,
        title: &'static str,
        slots: &[SlotItem],
        first_index: usize,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme.subtext1())
                .add_modifier(Modifier::BOLD),
        ))];

        if slots.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No hours",
                Style::default().fg(theme.overlay0()),
            )));
            return lines;
        }

        for (row, chunk) in slots.chunks(self.columns).enumerate() {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .flat_map(|(col, item)| {
                    let index = first_index + row * self.columns + col;
                    [
                        Span::styled(format!(" {} ", item.slot.hour_formatted), self.slot_style(item, index, theme)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            lines.push(Line::from(spans));
        }
        lines
    }

    fn slot_style(&self, item: &SlotItem, index: usize, theme: &Theme) -> Style {
        let mut style = if item.selected {
            Style::default()
                .fg(theme.base())
                .bg(theme.peach())
                .add_modifier(Modifier::BOLD)
        } else if item.slot.available {
            Style::default().fg(theme.text()).bg(theme.surface1())
        } else {
            Style::default()
                .fg(theme.overlay0())
                .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
        };

        if self.focused && index == self.cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        style
    }
}

impl Component for HourGrid {
    type Output = u8;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = Arc::clone(&self.resolver);

        let result = if r.matches_nav(&key, NavAction::Left) {
            self.step(-1);
            EventResult::Consumed
        } else if r.matches_nav(&key, NavAction::Right) {
            self.step(1);
            EventResult::Consumed
        } else if r.matches_nav(&key, NavAction::Up) {
            self.step_row(true);
            EventResult::Consumed
        } else if r.matches_nav(&key, NavAction::Down) {
            self.step_row(false);
            EventResult::Consumed
        } else if r.matches_nav(&key, NavAction::Select) {
            match self.highlighted() {
                Some(item) if item.slot.available => item.slot.hour.into(),
                Some(_) => EventResult::Consumed,
                None => EventResult::Ignored,
            }
        } else {
            EventResult::Ignored
        };
        Ok(result)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.columns = usize::from((area.width / SLOT_WIDTH).max(1));

        let mut lines = self.section_lines("Morning", &self.morning, 0, theme);
        lines.push(Line::default());
        lines.extend(self.section_lines("Afternoon", &self.afternoon, self.morning.len(), theme));

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::booking::model::FormattedSlot;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn item(hour: u8, available: bool) -> SlotItem {
        SlotItem {
            slot: FormattedSlot {
                hour,
                available,
                hour_formatted: format!("{hour:02}:00"),
            },
            selected: false,
        }
    }

    fn grid() -> HourGrid {
        let mut grid = HourGrid::new(Arc::new(KeyResolver::default()));
        grid.set_slots(
            vec![item(8, true), item(9, false)],
            vec![item(13, true), item(14, true)],
        );
        grid
    }

    #[test]
    fn test_select_available_slot() {
        let mut grid = grid();
        assert_eq!(grid.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Event(8));
    }

    #[test]
    fn test_unavailable_slot_not_emitted() {
        let mut grid = grid();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 9);
        assert_eq!(grid.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Consumed);
    }

    #[test]
    fn test_cursor_crosses_sections() {
        let mut grid = grid();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 13);
        assert_eq!(grid.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Event(13));
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut grid = grid();
        grid.handle_key(key(KeyCode::Left)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 8);

        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 14);
        grid.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 14);

        // Fewer slots after a reload
        grid.set_slots(vec![item(10, true)], Vec::new());
        assert_eq!(grid.highlighted().unwrap().slot.hour, 10);
    }

    #[test]
    fn test_vertical_moves_keep_column() {
        let mut grid = HourGrid::new(Arc::new(KeyResolver::default()));
        grid.columns = 2;
        // 08 09 / 10 / 13 14 / 15
        grid.set_slots(
            vec![item(8, true), item(9, true), item(10, true)],
            vec![item(13, true), item(14, true), item(15, true)],
        );

        grid.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 9);

        // Short morning row clamps to its last slot
        grid.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 10);

        grid.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 13);

        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 10);

        grid.handle_key(key(KeyCode::Up)).unwrap();
        grid.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 8);
    }

    #[test]
    fn test_down_from_morning_lands_in_same_column() {
        let mut grid = HourGrid::new(Arc::new(KeyResolver::default()));
        grid.columns = 4;
        grid.set_slots(
            vec![item(8, true), item(9, true), item(10, true)],
            vec![item(12, true), item(13, true), item(14, true), item(15, true), item(16, true)],
        );
        grid.handle_key(key(KeyCode::Right)).unwrap();
        grid.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 13);

        grid.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(grid.highlighted().unwrap().slot.hour, 16);
    }

    #[test]
    fn test_empty_grid() {
        let mut grid = HourGrid::new(Arc::new(KeyResolver::default()));
        assert!(grid.highlighted().is_none());
        assert_eq!(grid.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Ignored);
        grid.handle_key(key(KeyCode::Right)).unwrap();
        assert!(grid.highlighted().is_none());
    }
}
