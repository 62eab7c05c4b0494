//! Messages for the booking screen.
//!
//! User intents, lifecycle and async fetch results all flow through
//! [`BookingMsg`] and are applied one at a time by the screen's `update()`.

use chrono::NaiveDate;

use crate::api::{AvailabilitySlot, Provider};
use crate::booking::command::AvailabilityRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingMsg {
    // === Lifecycle ===
    /// Screen mounted, load providers and the first day
    Initialize,
    /// Leave the screen
    Close,

    // === Selection ===
    /// User picked a provider
    SelectProvider(String),
    /// Date picker change event, `None` when dismissed without a date
    DateChanged(Option<NaiveDate>),
    /// Show or hide the date picker
    ToggleDatePicker,
    /// User picked an hour slot
    SelectHour(u8),

    // === Async Results ===
    /// Provider directory loaded
    ProvidersLoaded(Vec<Provider>),
    /// Provider directory could not be loaded
    ProvidersFailed(String),
    /// Day availability loaded for a request
    AvailabilityLoaded {
        request: AvailabilityRequest,
        slots: Vec<AvailabilitySlot>,
    },
    /// Day availability could not be loaded for a request
    AvailabilityFailed {
        request: AvailabilityRequest,
        error: String,
    },
}
