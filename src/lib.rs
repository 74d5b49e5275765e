pub mod cities;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod models;
pub mod runtime;
pub mod session;

pub use cities::CityCatalog;
pub use client::{HttpListingClient, ListingSource, PriceRange, SearchQuery};
pub use config::Config;
pub use detail::{DetailController, DetailState};
pub use error::{ErrorKind, FetchError};
pub use models::{DetailHandoff, Listing, Status};
pub use runtime::{Intent, ScannerRuntime, Update};
pub use session::{SessionCommand, SessionController, SessionState};
