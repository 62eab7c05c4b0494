//! In-memory booking API for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use color_eyre::Result;
use color_eyre::eyre::eyre;

use crate::api::{AvailabilitySlot, BookingApi, Provider};
use crate::booking::selection::SelectionKey;

pub fn provider(id: &str) -> Provider {
    Provider {
        id: id.to_string(),
        name: format!("Provider {id}"),
        avatar_url: format!("http://avatars/{id}.png"),
    }
}

pub fn slot(hour: u8, available: bool) -> AvailabilitySlot {
    AvailabilitySlot { hour, available }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

/// Answers from fixed data and records every availability request.
#[derive(Default)]
pub struct FakeApi {
    providers: Option<Vec<Provider>>,
    days: HashMap<SelectionKey, Vec<AvailabilitySlot>>,
    calls: Mutex<Vec<SelectionKey>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = Some(providers);
        self
    }

    pub fn with_day(mut self, provider_id: &str, date: NaiveDate, slots: Vec<AvailabilitySlot>) -> Self {
        self.days.insert(
            SelectionKey {
                provider_id: provider_id.to_string(),
                date,
            },
            slots,
        );
        self
    }

    pub fn availability_calls(&self) -> Vec<SelectionKey> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.providers
            .clone()
            .ok_or_else(|| eyre!("directory unavailable"))
    }

    async fn day_availability(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        let key = SelectionKey {
            provider_id: provider_id.to_string(),
            date,
        };
        self.calls.lock().unwrap().push(key.clone());
        self.days
            .get(&key)
            .cloned()
            .ok_or_else(|| eyre!("no availability for {key}"))
    }
}

/// Never answers.
pub struct HangingApi;

#[async_trait]
impl BookingApi for HangingApi {
    async fn list_providers(&self) -> Result<Vec<Provider>> {
        std::future::pending().await
    }

    async fn day_availability(
        &self,
        _provider_id: &str,
        _date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>> {
        std::future::pending().await
    }
}
