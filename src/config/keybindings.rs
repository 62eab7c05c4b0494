use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub back: KeyBinding,
    pub focus_next: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub left: KeyBinding,
    pub right: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub toggle: KeyBinding,
    pub exit: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingKeybindings {
    pub toggle_date_picker: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerKeybindings {
    pub previous_month: KeyBinding,
    pub next_month: KeyBinding,
    pub today: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub search: SearchKeybindings,
    pub booking: BookingKeybindings,
    pub picker: PickerKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            back: Key::new(KeyCode::Esc).into(),
            focus_next: Key::new(KeyCode::Tab).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::new(KeyCode::Char('j')), Key::new(KeyCode::Down)]),
            left: KeyBinding::multiple(vec![Key::new(KeyCode::Char('h')), Key::new(KeyCode::Left)]),
            right: KeyBinding::multiple(vec![Key::new(KeyCode::Char('l')), Key::new(KeyCode::Right)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            toggle: Key::new(KeyCode::Char('/')).into(),
            exit: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for BookingKeybindings {
    fn default() -> Self {
        Self {
            toggle_date_picker: Key::new(KeyCode::Char('d')).into(),
        }
    }
}

impl Default for PickerKeybindings {
    fn default() -> Self {
        Self {
            previous_month: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('[')),
                Key::new(KeyCode::PageUp),
            ]),
            next_month: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char(']')),
                Key::new(KeyCode::PageDown),
            ]),
            today: Key::new(KeyCode::Char('t')).into(),
        }
    }
}
