//! Derived views over fetched availability.

use crate::api::AvailabilitySlot;

/// Hours strictly before this belong to the morning bucket.
pub const AFTERNOON_START_HOUR: u8 = 12;

/// An availability slot with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSlot {
    pub hour: u8,
    pub available: bool,
    pub hour_formatted: String,
}

impl From<&AvailabilitySlot> for FormattedSlot {
    fn from(slot: &AvailabilitySlot) -> Self {
        Self {
            hour: slot.hour,
            available: slot.available,
            hour_formatted: format_hour(slot.hour),
        }
    }
}

/// Availability split into display buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayParts {
    pub morning: Vec<FormattedSlot>,
    pub afternoon: Vec<FormattedSlot>,
}

/// Label for a whole hour, e.g. `9` -> `"09:00"`.
pub fn format_hour(hour: u8) -> String {
    format!("{hour:02}:00")
}

/// Split slots into morning (`hour < 12`) and afternoon (`hour >= 12`),
/// keeping the input order within each bucket.
pub fn partition(slots: &[AvailabilitySlot]) -> DayParts {
    let (morning, afternoon): (Vec<_>, Vec<_>) = slots
        .iter()
        .map(FormattedSlot::from)
        .partition(|slot| slot.hour < AFTERNOON_START_HOUR);
    DayParts { morning, afternoon }
}
