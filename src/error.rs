use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Shown when the search service fails without explaining why
pub const GENERIC_FETCH_MESSAGE: &str = "Failed to load rooms :(";
pub const VALIDATION_MESSAGE: &str = "Please select a valid city from the dropdown.";
pub const EMPTY_FIRST_PAGE_MESSAGE: &str = "No rooms found in that price range";
pub const PHOTOS_FAILED_MESSAGE: &str = "Failed to load photos.";

/// Classification of a failure surfaced in session snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Server,
    Decode,
    Timeout,
    EmptyFirstPage,
}

/// Failure of a single exchange with the search or detail service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Server { .. } => ErrorKind::Server,
            FetchError::Decode(_) => ErrorKind::Decode,
            FetchError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Message suitable for showing next to the search box
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            FetchError::Timeout(_) => "The room search took too long to respond".to_string(),
            FetchError::Decode(_) => "Received an unreadable response from the room search".to_string(),
            _ => GENERIC_FETCH_MESSAGE.to_string(),
        }
    }
}
