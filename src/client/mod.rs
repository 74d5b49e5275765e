pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpListingClient;
pub use traits::ListingSource;
pub use types::{PriceRange, SearchQuery};
