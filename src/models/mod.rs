use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A city name drawn from the catalog
pub type CityName = String;

/// Lifecycle of a search or gallery view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
}

/// A room listing as returned by the search service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub header: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    pub link: String,
    #[serde(skip_deserializing, default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

/// The scraper sends `null` for text it could not find
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Listing {
    /// Fields passed to the detail view when the user opens a listing
    pub fn handoff(&self) -> DetailHandoff {
        DetailHandoff {
            link: self.link.clone(),
            title: self.title.clone(),
            header: self.header.clone(),
            description: self.description.clone(),
        }
    }
}

/// Navigation payload for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailHandoff {
    pub link: String,
    pub title: String,
    pub header: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_decodes_with_missing_optional_fields() {
        let json = r#"{"_id": "abc", "link": "https://rooms.example/abc"}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();

        assert_eq!(listing.id, "abc");
        assert_eq!(listing.link, "https://rooms.example/abc");
        assert!(listing.description.is_empty());
        assert!(listing.header.is_empty());
    }

    #[test]
    fn test_null_text_fields_do_not_fail_the_page() {
        let json = r#"[
            {"_id": "a", "header": null, "title": "Box room", "description": null,
             "price": null, "image": null, "link": "https://rooms.example/a"},
            {"_id": "b", "title": "Double", "description": "Garden view",
             "link": "https://rooms.example/b"}
        ]"#;
        let listings: Vec<Listing> = serde_json::from_str(json).unwrap();

        assert_eq!(listings.len(), 2);
        assert!(listings[0].description.is_empty());
        assert!(listings[0].header.is_empty());
        assert!(listings[0].price.is_empty());
        assert_eq!(listings[0].title, "Box room");
        assert_eq!(listings[1].description, "Garden view");
        assert!(listings[0].handoff().description.is_empty());
    }

    #[test]
    fn test_listing_requires_id() {
        let json = r#"{"link": "https://rooms.example/abc", "title": "Double room"}"#;
        assert!(serde_json::from_str::<Listing>(json).is_err());
    }

    #[test]
    fn test_handoff_carries_navigation_fields() {
        let json = r#"{
            "_id": "1",
            "header": "Camden",
            "title": "Bright double",
            "description": "Close to the tube",
            "price": "£900 pcm",
            "image": "https://img.example/1.jpg",
            "link": "https://rooms.example/1"
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        let handoff = listing.handoff();

        assert_eq!(handoff.link, "https://rooms.example/1");
        assert_eq!(handoff.title, "Bright double");
        assert_eq!(handoff.header, "Camden");
        assert_eq!(handoff.description, "Close to the tube");
    }
}
