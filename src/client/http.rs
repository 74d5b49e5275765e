use crate::client::traits::ListingSource;
use crate::client::types::SearchQuery;
use crate::config::Config;
use crate::error::FetchError;
use crate::models::Listing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failure body the search service sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the room search service
pub struct HttpListingClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpListingClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    /// Create a client for the configured backend
    pub fn with_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.backend_url)
            .with_context(|| format!("Invalid backend URL: {}", config.backend_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot carry a path: {}", config.backend_url);
        }

        Ok(Self {
            client,
            base_url,
            timeout: config.request_timeout,
        })
    }

    /// `{base}/scrape-images/{city}/{page}` with the city percent-encoded
    pub fn listings_url(&self, query: &SearchQuery) -> Url {
        let page = query.page.to_string();
        self.endpoint(&["scrape-images", query.city.as_str(), page.as_str()])
    }

    pub fn photos_url(&self) -> Url {
        self.endpoint(&["scrape-photos"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `with_config`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.to_string())
        }
    }

    /// Turn a response into `T`, treating an empty or `null` body as `T::default()`
    async fn decode<T>(&self, response: Response) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status();

        if !status.is_success() {
            warn!("Search service returned status: {}", status);
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        debug!("Downloaded {} bytes", body.len());

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice::<Option<T>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ListingSource for HttpListingClient {
    async fn fetch_listings(&self, query: &SearchQuery) -> Result<Vec<Listing>, FetchError> {
        let url = self.listings_url(query);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .query(&query.price)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let listings: Vec<Listing> = self.decode(response).await?;
        info!(
            "Fetched {} listings for {} page {}",
            listings.len(),
            query.city,
            query.page
        );
        Ok(listings)
    }

    async fn fetch_photos(&self, link: &str) -> Result<Vec<String>, FetchError> {
        let url = self.photos_url();
        debug!("Fetching photos for {}", link);

        let response = self
            .client
            .get(url)
            .query(&[("link", link)])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let photos: Vec<String> = self.decode(response).await?;
        info!("Fetched {} photos for {}", photos.len(), link);
        Ok(photos)
    }

    fn source_name(&self) -> &'static str {
        "room search service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::PriceRange;

    fn client_for(base: &str) -> HttpListingClient {
        let config = Config {
            backend_url: base.to_string(),
            ..Config::default()
        };
        HttpListingClient::with_config(&config).unwrap()
    }

    #[test]
    fn test_listings_url_encodes_city() {
        let client = client_for("http://localhost:5000");
        let query = SearchQuery::new("St Albans", 2, PriceRange::default());

        assert_eq!(
            client.listings_url(&query).as_str(),
            "http://localhost:5000/scrape-images/St%20Albans/2"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let client = client_for("https://rooms.example/api/");
        let query = SearchQuery::new("York", 1, PriceRange::default());

        assert_eq!(
            client.listings_url(&query).as_str(),
            "https://rooms.example/api/scrape-images/York/1"
        );
        assert_eq!(
            client.photos_url().as_str(),
            "https://rooms.example/api/scrape-photos"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        let config = Config {
            backend_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(HttpListingClient::with_config(&config).is_err());
    }
}
