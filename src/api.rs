//! Remote booking API.
//!
//! The booking screen only talks to the remote services through the
//! [`BookingApi`] trait. [`BookingClient`] is the HTTP implementation used by
//! the binary; tests substitute in-memory fakes.

mod client;
mod types;

use async_trait::async_trait;
use chrono::NaiveDate;
use color_eyre::Result;

pub use client::BookingClient;
pub use types::{AvailabilitySlot, Provider};

/// Directory and availability services consumed by the booking screen.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// All providers usable for booking.
    async fn list_providers(&self) -> Result<Vec<Provider>>;

    /// Hour slots for one provider on one calendar day.
    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>>;
}
