//! Fetch commands for the booking screen.
//!
//! Commands run on the tokio runtime and only report back through the
//! screen's message channel. Each one races its work against a
//! cancellation token so unmounting the screen abandons it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::api::BookingApi;
use crate::booking::message::BookingMsg;
use crate::booking::selection::SelectionKey;
use crate::commands::Command;

/// Tag attached to an availability fetch.
///
/// `generation` grows with every fetch the screen issues; only the result
/// carrying the latest generation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub generation: u64,
    pub key: SelectionKey,
}

/// Load the provider directory.
pub struct FetchProvidersCmd {
    api: Arc<dyn BookingApi>,
    tx: UnboundedSender<BookingMsg>,
    cancel: CancellationToken,
}

impl FetchProvidersCmd {
    pub fn new(
        api: Arc<dyn BookingApi>,
        tx: UnboundedSender<BookingMsg>,
        cancel: CancellationToken,
    ) -> Self {
        Self { api, tx, cancel }
    }
}

#[async_trait]
impl Command for FetchProvidersCmd {
    fn name(&self) -> String {
        "Loading providers".to_string()
    }

    async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
        let Self { api, tx, cancel } = *self;
        let result = tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("Provider fetch abandoned");
                return Ok(());
            }
            result = api.list_providers() => result,
        };

        let msg = match result {
            Ok(providers) => BookingMsg::ProvidersLoaded(providers),
            Err(e) => BookingMsg::ProvidersFailed(e.to_string()),
        };
        // The screen may be gone already
        let _ = tx.send(msg);
        Ok(())
    }
}

/// Load the availability of one provider on one day.
pub struct FetchAvailabilityCmd {
    api: Arc<dyn BookingApi>,
    request: AvailabilityRequest,
    tx: UnboundedSender<BookingMsg>,
    cancel: CancellationToken,
}

impl FetchAvailabilityCmd {
    pub fn new(
        api: Arc<dyn BookingApi>,
        request: AvailabilityRequest,
        tx: UnboundedSender<BookingMsg>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            request,
            tx,
            cancel,
        }
    }
}

#[async_trait]
impl Command for FetchAvailabilityCmd {
    fn name(&self) -> String {
        format!("Loading availability for {}", self.request.key)
    }

    async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
        let Self {
            api,
            request,
            tx,
            cancel,
        } = *self;
        let result = tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!(
                    "Availability fetch #{} for {} abandoned",
                    request.generation,
                    request.key
                );
                return Ok(());
            }
            result = api.day_availability(&request.key.provider_id, request.key.date) => result,
        };

        let msg = match result {
            Ok(slots) => BookingMsg::AvailabilityLoaded { request, slots },
            Err(e) => BookingMsg::AvailabilityFailed {
                request,
                error: e.to_string(),
            },
        };
        let _ = tx.send(msg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::booking::fake::{FakeApi, HangingApi, day, provider, slot};

    fn request(provider_id: &str) -> AvailabilityRequest {
        AvailabilityRequest {
            generation: 7,
            key: SelectionKey {
                provider_id: provider_id.to_string(),
                date: day(10),
            },
        }
    }

    #[tokio::test]
    async fn test_fetch_providers_reports_result() {
        let api = Arc::new(FakeApi::new().with_providers(vec![provider("p1")]));
        let (tx, mut rx) = mpsc::unbounded_channel();

        Box::new(FetchProvidersCmd::new(api, tx, CancellationToken::new()))
            .execute()
            .await
            .unwrap();

        match rx.try_recv().unwrap() {
            BookingMsg::ProvidersLoaded(providers) => assert_eq!(providers, vec![provider("p1")]),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_providers_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        Box::new(FetchProvidersCmd::new(
            Arc::new(FakeApi::new()),
            tx,
            CancellationToken::new(),
        ))
        .execute()
        .await
        .unwrap();

        assert!(matches!(rx.try_recv().unwrap(), BookingMsg::ProvidersFailed(_)));
    }

    #[tokio::test]
    async fn test_fetch_availability_keeps_request_tag() {
        let api = Arc::new(FakeApi::new().with_day("p1", day(10), vec![slot(9, true)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = FetchAvailabilityCmd::new(api, request("p1"), tx, CancellationToken::new());
        assert_eq!(cmd.name(), "Loading availability for p1@2024-05-10");

        Box::new(cmd).execute().await.unwrap();

        match rx.try_recv().unwrap() {
            BookingMsg::AvailabilityLoaded { request: tag, slots } => {
                assert_eq!(tag, request("p1"));
                assert_eq!(slots, vec![slot(9, true)]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_availability_failure_keeps_request_tag() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        Box::new(FetchAvailabilityCmd::new(
            Arc::new(FakeApi::new()),
            request("p9"),
            tx,
            CancellationToken::new(),
        ))
        .execute()
        .await
        .unwrap();

        match rx.try_recv().unwrap() {
            BookingMsg::AvailabilityFailed { request: tag, .. } => assert_eq!(tag, request("p9")),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_fetch_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(
            Box::new(FetchAvailabilityCmd::new(
                Arc::new(HangingApi),
                request("p1"),
                tx.clone(),
                cancel.clone(),
            ))
            .execute(),
        );
        let providers = tokio::spawn(
            Box::new(FetchProvidersCmd::new(Arc::new(HangingApi), tx, cancel.clone())).execute(),
        );

        cancel.cancel();
        handle.await.unwrap().unwrap();
        providers.await.unwrap().unwrap();

        assert!(rx.try_recv().is_err());
    }
}
