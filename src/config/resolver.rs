use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{BookingAction, GlobalAction, NavAction, PickerAction, SearchAction};
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions and back to display strings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Back => kb.back.matches(event),
            GlobalAction::FocusNext => kb.focus_next.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Back => kb.back.display(),
            GlobalAction::FocusNext => kb.focus_next.display(),
        }
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.matches(event),
            NavAction::Down => kb.down.matches(event),
            NavAction::Left => kb.left.matches(event),
            NavAction::Right => kb.right.matches(event),
            NavAction::Select => kb.select.matches(event),
        }
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.display(),
            NavAction::Down => kb.down.display(),
            NavAction::Left => kb.left.display(),
            NavAction::Right => kb.right.display(),
            NavAction::Select => kb.select.display(),
        }
    }

    // Search actions
    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => kb.toggle.matches(event),
            SearchAction::Exit => kb.exit.matches(event),
        }
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Toggle => kb.toggle.display(),
            SearchAction::Exit => kb.exit.display(),
        }
    }

    // Booking actions
    pub fn matches_booking(&self, event: &KeyEvent, action: BookingAction) -> bool {
        let kb = &self.keybindings.booking;
        match action {
            BookingAction::ToggleDatePicker => kb.toggle_date_picker.matches(event),
        }
    }

    pub fn display_booking(&self, action: BookingAction) -> String {
        let kb = &self.keybindings.booking;
        match action {
            BookingAction::ToggleDatePicker => kb.toggle_date_picker.display(),
        }
    }

    // Date picker actions
    pub fn matches_picker(&self, event: &KeyEvent, action: PickerAction) -> bool {
        let kb = &self.keybindings.picker;
        match action {
            PickerAction::PreviousMonth => kb.previous_month.matches(event),
            PickerAction::NextMonth => kb.next_month.matches(event),
            PickerAction::Today => kb.today.matches(event),
        }
    }

    pub fn display_picker(&self, action: PickerAction) -> String {
        let kb = &self.keybindings.picker;
        match action {
            PickerAction::PreviousMonth => kb.previous_month.display(),
            PickerAction::NextMonth => kb.next_month.display(),
            PickerAction::Today => kb.today.display(),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
