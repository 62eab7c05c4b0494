use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::Theme;
use crate::api::{AvailabilitySlot, BookingApi, Provider};
use crate::booking::command::{AvailabilityRequest, FetchAvailabilityCmd, FetchProvidersCmd};
use crate::booking::message::BookingMsg;
use crate::booking::model::{DayParts, FormattedSlot, partition};
use crate::booking::selection::Selection;
use crate::booking::view::{BookingView, ProviderItem, SlotItem, ViewModel};
use crate::commands::Command;
use crate::config::KeyResolver;
use crate::screen::{Screen, ScreenMsg};
use crate::ui::{Component, EventResult, Keybinding};

/// Slot selection screen: provider, day and hour.
///
/// Availability is reloaded whenever the provider or the date changes.
/// Each reload gets a new generation number and cancels the one before it;
/// results tagged with an older generation are dropped.
pub struct BookingScreen {
    api: Arc<dyn BookingApi>,
    selection: Selection,

    providers: Vec<Provider>,
    providers_loading: bool,
    providers_error: Option<String>,

    availability: Vec<AvailabilitySlot>,
    availability_generation: u64,
    availability_loading: bool,
    availability_error: Option<String>,
    availability_cancel: Option<CancellationToken>,

    /// Cleared on destroy; fetch results arriving afterwards are ignored.
    mounted: bool,
    cancel: CancellationToken,

    view: BookingView,
    msg_tx: UnboundedSender<BookingMsg>,
    msg_rx: UnboundedReceiver<BookingMsg>,
}

impl BookingScreen {
    pub fn new(api: Arc<dyn BookingApi>, selection: Selection, resolver: Arc<KeyResolver>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            api,
            selection,
            providers: Vec::new(),
            providers_loading: false,
            providers_error: None,
            availability: Vec::new(),
            availability_generation: 0,
            availability_loading: false,
            availability_error: None,
            availability_cancel: None,
            mounted: false,
            cancel: CancellationToken::new(),
            view: BookingView::new(resolver),
            msg_tx,
            msg_rx,
        };
        screen.sync_view();
        screen
    }

    /// The fetched availability split into morning and afternoon.
    pub fn day_parts(&self) -> DayParts {
        partition(&self.availability)
    }

    /// Snapshot handed to the view on every key and frame.
    pub fn view_model(&self) -> ViewModel {
        let providers = self
            .providers
            .iter()
            .map(|provider| ProviderItem {
                selected: self.selection.is_provider_selected(&provider.id),
                provider: provider.clone(),
            })
            .collect();

        let parts = self.day_parts();
        let to_items = |slots: Vec<FormattedSlot>| -> Vec<SlotItem> {
            slots
                .into_iter()
                .map(|slot| SlotItem {
                    selected: self.selection.is_hour_selected(slot.hour),
                    slot,
                })
                .collect()
        };

        ViewModel {
            providers,
            providers_loading: self.providers_loading,
            providers_error: self.providers_error.clone(),
            date: self.selection.date(),
            date_picker_visible: self.selection.date_picker_visible(),
            picker_style: self.selection.picker_style(),
            hour: self.selection.hour(),
            morning: to_items(parts.morning),
            afternoon: to_items(parts.afternoon),
            availability_loading: self.availability_loading,
            availability_error: self.availability_error.clone(),
        }
    }

    fn sync_view(&mut self) {
        let state = self.view_model();
        self.view.sync(state);
    }

    fn queue(&self, msg: BookingMsg) {
        let _ = self.msg_tx.send(msg);
    }

    fn process_message(&mut self, msg: BookingMsg) -> ScreenMsg {
        match msg {
            BookingMsg::Initialize => {
                self.mounted = true;
                let providers = self.fetch_providers();
                let availability = self.fetch_availability();
                ScreenMsg::Run(vec![providers, availability])
            }

            BookingMsg::Close => ScreenMsg::Close,

            BookingMsg::SelectProvider(provider_id) => {
                tracing::debug!("Provider selected: {}", provider_id);
                self.selection.select_provider(provider_id);
                ScreenMsg::Run(vec![self.fetch_availability()])
            }

            BookingMsg::DateChanged(date) => {
                if self.selection.select_date(date) {
                    tracing::debug!("Date selected: {}", self.selection.date());
                    ScreenMsg::Run(vec![self.fetch_availability()])
                } else {
                    ScreenMsg::Idle
                }
            }

            BookingMsg::ToggleDatePicker => {
                self.selection.toggle_date_picker();
                if self.selection.date_picker_visible() {
                    self.view.open_picker(self.selection.date());
                }
                ScreenMsg::Idle
            }

            BookingMsg::SelectHour(hour) => {
                self.selection.select_hour(hour);
                ScreenMsg::Idle
            }

            BookingMsg::ProvidersLoaded(providers) => {
                if self.mounted {
                    tracing::debug!("Loaded {} providers", providers.len());
                    self.providers = providers;
                    self.providers_loading = false;
                    self.providers_error = None;
                } else {
                    tracing::debug!("Dropping provider list, screen is gone");
                }
                ScreenMsg::Idle
            }

            BookingMsg::ProvidersFailed(error) => {
                if self.mounted {
                    tracing::warn!("Failed to load providers: {}", error);
                    self.providers_loading = false;
                    self.providers_error = Some(error);
                }
                ScreenMsg::Idle
            }

            BookingMsg::AvailabilityLoaded { request, slots } => {
                if self.accepts(&request) {
                    tracing::debug!("Loaded {} slots for {}", slots.len(), request.key);
                    self.availability = slots;
                    self.availability_loading = false;
                    self.availability_error = None;
                }
                ScreenMsg::Idle
            }

            BookingMsg::AvailabilityFailed { request, error } => {
                if self.accepts(&request) {
                    tracing::warn!("Failed to load availability for {}: {}", request.key, error);
                    self.availability_loading = false;
                    self.availability_error = Some(error);
                }
                ScreenMsg::Idle
            }
        }
    }

    /// Whether an availability result may still be applied.
    fn accepts(&self, request: &AvailabilityRequest) -> bool {
        if !self.mounted {
            tracing::debug!("Dropping availability for {}, screen is gone", request.key);
            return false;
        }
        if request.generation != self.availability_generation {
            tracing::debug!(
                "Dropping stale availability #{} for {} (current #{})",
                request.generation,
                request.key,
                self.availability_generation
            );
            return false;
        }
        true
    }

    fn fetch_providers(&mut self) -> Box<dyn Command> {
        self.providers_loading = true;
        Box::new(FetchProvidersCmd::new(
            self.api.clone(),
            self.msg_tx.clone(),
            self.cancel.child_token(),
        ))
    }

    /// Start a reload for the current provider and date, superseding any
    /// reload still in flight. The old slots stay visible until it resolves.
    fn fetch_availability(&mut self) -> Box<dyn Command> {
        if let Some(previous) = self.availability_cancel.take() {
            previous.cancel();
        }
        let cancel = self.cancel.child_token();
        self.availability_cancel = Some(cancel.clone());

        self.availability_generation += 1;
        self.availability_loading = true;

        let request = AvailabilityRequest {
            generation: self.availability_generation,
            key: self.selection.key(),
        };
        tracing::debug!(
            "Fetching availability #{} for {}",
            request.generation,
            request.key
        );
        Box::new(FetchAvailabilityCmd::new(
            self.api.clone(),
            request,
            self.msg_tx.clone(),
            cancel,
        ))
    }
}

impl Screen for BookingScreen {
    fn init(&mut self) {
        self.queue(BookingMsg::Initialize);
    }

    fn destroy(&mut self) {
        tracing::debug!("Booking screen destroyed, abandoning fetches");
        self.mounted = false;
        self.cancel.cancel();
    }

    fn handle_tick(&mut self) {
        self.view.handle_tick();
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        self.sync_view();
        match self.view.handle_key(key) {
            Ok(EventResult::Event(msg)) => {
                self.queue(msg);
                EventResult::Consumed
            }
            Ok(EventResult::Consumed) => EventResult::Consumed,
            Ok(EventResult::Ignored) => EventResult::Ignored,
            Err(e) => {
                tracing::warn!("Key handling failed: {}", e);
                EventResult::Consumed
            }
        }
    }

    fn update(&mut self) -> Result<ScreenMsg> {
        // Drain all pending messages
        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        while let Ok(msg) = self.msg_rx.try_recv() {
            match self.process_message(msg) {
                ScreenMsg::Idle => {}
                ScreenMsg::Run(cmds) => commands.extend(cmds),
                ScreenMsg::Close => return Ok(ScreenMsg::Close),
            }
        }

        if commands.is_empty() {
            Ok(ScreenMsg::Idle)
        } else {
            Ok(ScreenMsg::Run(commands))
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.sync_view();
        self.view.render(frame, area, theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let provider = self
            .providers
            .iter()
            .find(|p| self.selection.is_provider_selected(&p.id))
            .map_or_else(|| self.selection.provider_id().to_string(), |p| p.name.clone());
        vec![
            "Book".to_string(),
            provider,
            self.selection.date().format("%Y-%m-%d").to_string(),
        ]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        self.view.keybindings()
    }
}
