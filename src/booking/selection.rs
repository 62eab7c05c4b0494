//! The screen's working selection and its reset rules.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the date picker behaves after a date is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PickerStyle {
    /// The picker closes itself after every change event.
    #[default]
    AutoDismiss,
    /// The picker stays open until explicitly toggled.
    Explicit,
}

/// The `(provider, date)` pair availability is fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub provider_id: String,
    pub date: NaiveDate,
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.provider_id, self.date)
    }
}

/// Provider, date and hour currently chosen on the booking screen.
///
/// Changing the provider or the date always clears the chosen hour. The hour
/// itself is never validated against availability here; the hour grid only
/// offers available slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    provider_id: String,
    date: NaiveDate,
    hour: Option<u8>,
    date_picker_visible: bool,
    picker_style: PickerStyle,
}

impl Selection {
    pub fn new(provider_id: impl Into<String>, date: NaiveDate, picker_style: PickerStyle) -> Self {
        Self {
            provider_id: provider_id.into(),
            date,
            hour: None,
            date_picker_visible: false,
            picker_style,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn hour(&self) -> Option<u8> {
        self.hour
    }

    pub const fn date_picker_visible(&self) -> bool {
        self.date_picker_visible
    }

    pub const fn picker_style(&self) -> PickerStyle {
        self.picker_style
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            provider_id: self.provider_id.clone(),
            date: self.date,
        }
    }

    pub fn is_provider_selected(&self, provider_id: &str) -> bool {
        self.provider_id == provider_id
    }

    pub fn is_hour_selected(&self, hour: u8) -> bool {
        self.hour == Some(hour)
    }

    /// Choose a provider. Unknown ids are accepted as-is.
    pub fn select_provider(&mut self, provider_id: impl Into<String>) {
        self.provider_id = provider_id.into();
        self.hour = None;
    }

    /// Handle a change event from the date picker.
    ///
    /// `None` means the picker was dismissed without a date. Returns `true`
    /// when the date was set and availability has to be reloaded.
    pub fn select_date(&mut self, date: Option<NaiveDate>) -> bool {
        if self.picker_style == PickerStyle::AutoDismiss {
            self.date_picker_visible = false;
        }

        let Some(date) = date else {
            return false;
        };
        self.date = date;
        self.hour = None;
        true
    }

    pub fn toggle_date_picker(&mut self) {
        self.date_picker_visible = !self.date_picker_visible;
    }

    pub fn select_hour(&mut self, hour: u8) {
        self.hour = Some(hour);
    }
}
