use crate::client::types::SearchQuery;
use crate::error::FetchError;
use crate::models::Listing;
use async_trait::async_trait;

/// Common trait for anything that can serve room listings and photo galleries
/// The runtime only talks to this, so tests can swap in scripted sources
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of listings. Performs exactly one exchange, no retries
    async fn fetch_listings(&self, query: &SearchQuery) -> Result<Vec<Listing>, FetchError>;

    /// Fetch the photo URLs behind a listing's external link
    async fn fetch_photos(&self, link: &str) -> Result<Vec<String>, FetchError>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
