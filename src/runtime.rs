//! # Scanner Runtime
//!
//! Drives the search and detail controllers against a [`ListingSource`].
//! Each fetch runs in its own tokio task bounded by a timeout; completions
//! come back over a channel and are reconciled one at a time by the owner of
//! the runtime, so state is only ever touched from one place.

use crate::cities::CityCatalog;
use crate::client::traits::ListingSource;
use crate::client::types::PriceRange;
use crate::detail::{DetailController, DetailState, DetailTag, PhotoRequest};
use crate::error::FetchError;
use crate::models::{DetailHandoff, Listing};
use crate::session::{
    FetchRequest, Reconciliation, RequestTag, SessionCommand, SessionController, SessionState,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    InputChanged(String),
    CitySelected(String),
    SubmitSearch,
    LoadMore,
    PriceRangeChanged(PriceRange),
    OpenDetail(DetailHandoff),
    CloseDetail,
}

/// Snapshot produced after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Search(SessionState),
    Detail(Option<DetailState>),
}

/// Result of a spawned fetch, sent back to the runtime
#[derive(Debug)]
enum Completion {
    Listings {
        tag: RequestTag,
        result: Result<Vec<Listing>, FetchError>,
    },
    Photos {
        tag: DetailTag,
        result: Result<Vec<String>, FetchError>,
    },
}

pub struct ScannerRuntime {
    source: Arc<dyn ListingSource>,
    search: SessionController,
    detail: DetailController,
    timeout: Duration,
    in_flight: usize,
    completion_receiver: mpsc::Receiver<Completion>,
    completion_sender: mpsc::Sender<Completion>,
}

impl ScannerRuntime {
    pub fn new(source: Arc<dyn ListingSource>, catalog: CityCatalog, timeout: Duration) -> Self {
        let (completion_sender, completion_receiver) = mpsc::channel(16);
        debug!("Creating runtime over {}", source.source_name());

        Self {
            source,
            search: SessionController::new(Arc::new(catalog)),
            detail: DetailController::new(),
            timeout,
            in_flight: 0,
            completion_receiver,
            completion_sender,
        }
    }

    pub fn search_state(&self) -> &SessionState {
        self.search.state()
    }

    pub fn detail_state(&self) -> Option<&DetailState> {
        self.detail.state()
    }

    /// Fetches spawned whose completion has not been reconciled yet, stale ones included
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply an intent and start any fetch it calls for. Must run inside a tokio runtime
    pub fn dispatch(&mut self, intent: Intent) -> Update {
        let command = match intent {
            Intent::OpenDetail(listing) => {
                if let Some(request) = self.detail.open(listing) {
                    self.spawn_photos(request);
                }
                return Update::Detail(self.detail.state().cloned());
            }
            Intent::CloseDetail => {
                self.detail.close();
                return Update::Detail(None);
            }
            Intent::InputChanged(text) => SessionCommand::InputChanged(text),
            Intent::CitySelected(city) => SessionCommand::CitySelected(city),
            Intent::SubmitSearch => SessionCommand::SubmitSearch,
            Intent::LoadMore => SessionCommand::LoadMore,
            Intent::PriceRangeChanged(price) => SessionCommand::PriceRangeChanged(price),
        };

        if let Some(request) = self.search.handle(command) {
            self.spawn_listings(request);
        }
        Update::Search(self.search.state().clone())
    }

    /// Wait for the next completion that changes state. Stale completions are
    /// consumed silently; returns `None` once nothing is left in flight
    pub async fn next_update(&mut self) -> Option<Update> {
        while self.in_flight > 0 {
            let completion = self.completion_receiver.recv().await?;
            if let Some(update) = self.apply(completion) {
                return Some(update);
            }
        }
        None
    }

    /// Non-blocking variant of [`next_update`](Self::next_update) for UI loops
    pub fn poll_update(&mut self) -> Option<Update> {
        while let Ok(completion) = self.completion_receiver.try_recv() {
            if let Some(update) = self.apply(completion) {
                return Some(update);
            }
        }
        None
    }

    fn apply(&mut self, completion: Completion) -> Option<Update> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Listings { tag, result } => {
                match self.search.reconcile(&tag, result) {
                    Reconciliation::Applied => Some(Update::Search(self.search.state().clone())),
                    Reconciliation::Stale => None,
                }
            }
            Completion::Photos { tag, result } => self
                .detail
                .reconcile(&tag, result)
                .then(|| Update::Detail(self.detail.state().cloned())),
        }
    }

    fn spawn_listings(&mut self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let sender = self.completion_sender.clone();
        let timeout = self.timeout;
        self.in_flight += 1;

        tokio::spawn(async move {
            let FetchRequest { tag, query } = request;
            let result =
                run_bounded(timeout, async move { source.fetch_listings(&query).await }).await;
            let _ = sender.send(Completion::Listings { tag, result }).await;
        });
    }

    fn spawn_photos(&mut self, request: PhotoRequest) {
        let source = Arc::clone(&self.source);
        let sender = self.completion_sender.clone();
        let timeout = self.timeout;
        self.in_flight += 1;

        tokio::spawn(async move {
            let PhotoRequest { tag, link } = request;
            let result = run_bounded(timeout, async move { source.fetch_photos(&link).await }).await;
            let _ = sender.send(Completion::Photos { tag, result }).await;
        });
    }
}

/// Run a fetch in its own task so a timeout aborts it and a panic still
/// yields a completion instead of leaving `in_flight` stuck
async fn run_bounded<T, F>(timeout: Duration, fetch: F) -> Result<T, FetchError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    let mut task = tokio::spawn(fetch);

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            warn!("Fetch task failed: {}", join_err);
            Err(FetchError::Network(format!("fetch task failed: {join_err}")))
        }
        Err(_) => {
            task.abort();
            Err(FetchError::Timeout(timeout))
        }
    }
}
