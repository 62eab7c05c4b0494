//! Appointment slot selection.
//!
//! A user picks a provider, a day and an hour. Availability for the
//! chosen provider and day is fetched whenever either changes, and changing
//! either always clears the chosen hour.

mod command;
#[cfg(test)]
mod fake;
mod message;
mod model;
mod screen;
mod selection;
mod view;

pub use screen::BookingScreen;
pub use selection::{PickerStyle, Selection};
