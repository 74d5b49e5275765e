use crate::error::{FetchError, PHOTOS_FAILED_MESSAGE};
use crate::models::{DetailHandoff, Status};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Photo gallery of the listing currently on screen
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailState {
    pub listing: DetailHandoff,
    pub photos: Vec<String>,
    pub status: Status,
    pub error_message: Option<String>,
}

/// Identifies which gallery a photo response was requested for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTag {
    pub link: String,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRequest {
    pub tag: DetailTag,
    pub link: String,
}

/// Owns the detail view's state. One gallery at a time
#[derive(Debug, Default)]
pub struct DetailController {
    state: Option<DetailState>,
    pending: Option<DetailTag>,
    next_seq: u64,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&DetailState> {
        self.state.as_ref()
    }

    /// Show a listing's gallery. Returns a request unless these photos are already shown or loading
    pub fn open(&mut self, listing: DetailHandoff) -> Option<PhotoRequest> {
        if let Some(current) = &self.state {
            if current.listing.link == listing.link && current.status != Status::Error {
                debug!("Gallery for {} already open", listing.link);
                return None;
            }
        }

        self.next_seq += 1;
        let tag = DetailTag {
            link: listing.link.clone(),
            seq: self.next_seq,
        };
        self.pending = Some(tag.clone());
        info!("Loading photos for {}", listing.link);

        let link = listing.link.clone();
        self.state = Some(DetailState {
            listing,
            photos: Vec::new(),
            status: Status::Loading,
            error_message: None,
        });

        Some(PhotoRequest { tag, link })
    }

    /// Leave the detail view; a photo response still in flight will be ignored
    pub fn close(&mut self) {
        self.state = None;
        self.pending = None;
    }

    /// Apply photos if they belong to the gallery still on screen. Returns whether they were applied
    pub fn reconcile(&mut self, tag: &DetailTag, outcome: Result<Vec<String>, FetchError>) -> bool {
        if self.pending.as_ref() != Some(tag) {
            debug!("Discarding photos for {} (no longer shown)", tag.link);
            return false;
        }
        self.pending = None;

        let Some(state) = self.state.as_mut() else {
            return false;
        };

        match outcome {
            Ok(photos) => {
                state.photos = photos;
                state.status = Status::Idle;
            }
            Err(err) => {
                warn!("Failed to load photos for {}: {}", tag.link, err);
                state.status = Status::Error;
                state.error_message = Some(PHOTOS_FAILED_MESSAGE.to_string());
            }
        }
        true
    }
}
