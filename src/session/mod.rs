//! Search session state machine.
//!
//! The controller never performs I/O. Commands that need data return a
//! [`FetchRequest`] carrying a [`RequestTag`]; whoever executes the request
//! hands the outcome back through [`SessionController::reconcile`] together
//! with that tag. Only the response for the one outstanding request is
//! applied; anything else is stale and dropped without a state transition.

use crate::cities::CityCatalog;
use crate::client::types::{PriceRange, SearchQuery};
use crate::error::{ErrorKind, FetchError, EMPTY_FIRST_PAGE_MESSAGE, VALIDATION_MESSAGE};
use crate::models::{CityName, Listing, Status};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Snapshot handed to the presentation layer after every transition
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionState {
    /// Raw input text, or the committed city once one is selected
    pub selected_city: String,
    pub current_page: u32,
    /// Page-then-server order, append-only within a session
    pub listings: Vec<Listing>,
    pub status: Status,
    pub error_message: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// Autocomplete suggestions for the current input
    pub candidate_cities: Vec<CityName>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selected_city: String::new(),
            current_page: 1,
            listings: Vec::new(),
            status: Status::Idle,
            error_message: None,
            error_kind: None,
            candidate_cities: Vec::new(),
        }
    }
}

/// Identifies the request a response belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTag {
    pub city: CityName,
    pub page: u32,
    // Distinguishes repeat requests for the same (city, page)
    seq: u64,
}

/// A fetch the caller must perform and report back
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub tag: RequestTag,
    pub query: SearchQuery,
}

/// Commands accepted from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    InputChanged(String),
    CitySelected(String),
    SubmitSearch,
    LoadMore,
    PriceRangeChanged(PriceRange),
}

/// What happened to a response handed to [`SessionController::reconcile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Applied,
    Stale,
}

/// Single owner of [`SessionState`]
pub struct SessionController {
    catalog: Arc<CityCatalog>,
    state: SessionState,
    price: PriceRange,
    pending: Option<RequestTag>,
    next_seq: u64,
    seen_ids: HashSet<String>,
}

impl SessionController {
    pub fn new(catalog: Arc<CityCatalog>) -> Self {
        Self {
            catalog,
            state: SessionState::default(),
            price: PriceRange::default(),
            pending: None,
            next_seq: 0,
            seen_ids: HashSet::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn price_range(&self) -> PriceRange {
        self.price
    }

    /// Tag of the request whose response would currently be applied
    pub fn pending(&self) -> Option<&RequestTag> {
        self.pending.as_ref()
    }

    pub fn handle(&mut self, command: SessionCommand) -> Option<FetchRequest> {
        match command {
            SessionCommand::InputChanged(text) => {
                self.input_changed(text);
                None
            }
            SessionCommand::CitySelected(city) => self.select_city(&city),
            SessionCommand::SubmitSearch => self.submit_search(),
            SessionCommand::LoadMore => self.load_more(),
            SessionCommand::PriceRangeChanged(price) => {
                self.price = price;
                None
            }
        }
    }

    /// Keystroke in the city box: uncommitted text, fresh suggestions, empty results
    pub fn input_changed(&mut self, text: String) {
        self.state.candidate_cities = self.catalog.match_input(&text);
        self.state.selected_city = text;
        self.reset_results();

        // The listings the pending request would extend are gone
        if self.pending.take().is_some() {
            debug!("Input changed while loading, abandoning pending request");
            self.state.status = Status::Idle;
        }
    }

    /// Commit a suggestion and start a fresh search
    pub fn select_city(&mut self, city: &str) -> Option<FetchRequest> {
        let Some(city) = self.catalog.resolve(city).cloned() else {
            self.state.selected_city = city.to_string();
            self.reset_results();
            self.fail_validation();
            return None;
        };

        self.state.selected_city = city;
        self.state.candidate_cities.clear();
        self.start_search()
    }

    /// Search for whatever city text is currently entered
    pub fn submit_search(&mut self) -> Option<FetchRequest> {
        let Some(city) = self.catalog.resolve(&self.state.selected_city).cloned() else {
            self.fail_validation();
            return None;
        };

        self.state.selected_city = city;
        self.state.candidate_cities.clear();
        self.start_search()
    }

    /// Request the page after the last one received
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.state.status == Status::Loading || self.state.listings.is_empty() {
            debug!(
                "Ignoring load more: status={:?}, listings={}",
                self.state.status,
                self.state.listings.len()
            );
            return None;
        }

        Some(self.issue(self.state.current_page + 1))
    }

    /// Apply the outcome of a request if it is still the one being awaited
    pub fn reconcile(
        &mut self,
        tag: &RequestTag,
        outcome: Result<Vec<Listing>, FetchError>,
    ) -> Reconciliation {
        if !self.is_current(tag) {
            debug!(
                "Discarding stale response for {} page {} (awaiting {:?})",
                tag.city, tag.page, self.pending
            );
            return Reconciliation::Stale;
        }
        self.pending = None;

        match outcome {
            Ok(batch) => {
                let received = batch.len();
                let mut appended = 0;
                for listing in batch {
                    if self.seen_ids.insert(listing.id.clone()) {
                        self.state.listings.push(listing);
                        appended += 1;
                    }
                }
                if appended < received {
                    warn!(
                        "Dropped {} duplicate listings from {} page {}",
                        received - appended,
                        tag.city,
                        tag.page
                    );
                }

                self.state.current_page = tag.page;
                if tag.page == 1 && received == 0 {
                    self.set_error(ErrorKind::EmptyFirstPage, EMPTY_FIRST_PAGE_MESSAGE.to_string());
                } else {
                    self.state.status = Status::Idle;
                    self.state.error_message = None;
                    self.state.error_kind = None;
                }
                info!(
                    "Applied {} listings for {} page {} ({} total)",
                    appended,
                    tag.city,
                    tag.page,
                    self.state.listings.len()
                );
            }
            Err(err) => {
                warn!("Fetch for {} page {} failed: {}", tag.city, tag.page, err);
                self.set_error(err.kind(), err.user_message());
            }
        }

        Reconciliation::Applied
    }

    fn is_current(&self, tag: &RequestTag) -> bool {
        self.pending.as_ref() == Some(tag) && tag.city == self.state.selected_city
    }

    fn start_search(&mut self) -> Option<FetchRequest> {
        self.reset_results();
        Some(self.issue(1))
    }

    fn issue(&mut self, page: u32) -> FetchRequest {
        self.next_seq += 1;
        let tag = RequestTag {
            city: self.state.selected_city.clone(),
            page,
            seq: self.next_seq,
        };
        if let Some(previous) = self.pending.replace(tag.clone()) {
            debug!(
                "Superseding request for {} page {}",
                previous.city, previous.page
            );
        }

        self.state.status = Status::Loading;
        self.state.error_message = None;
        self.state.error_kind = None;
        info!("Searching {} page {}", tag.city, page);

        FetchRequest {
            query: SearchQuery::new(tag.city.clone(), page, self.price),
            tag,
        }
    }

    fn reset_results(&mut self) {
        self.state.listings.clear();
        self.state.current_page = 1;
        self.seen_ids.clear();
    }

    fn fail_validation(&mut self) {
        // Nothing may land in a session that failed to start
        self.pending = None;
        self.set_error(ErrorKind::Validation, VALIDATION_MESSAGE.to_string());
    }

    fn set_error(&mut self, kind: ErrorKind, message: String) {
        self.state.status = Status::Error;
        self.state.error_message = Some(message);
        self.state.error_kind = Some(kind);
    }
}
