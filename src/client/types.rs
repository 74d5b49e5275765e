use crate::models::CityName;
use serde::{Deserialize, Serialize};

/// Optional price bounds (GBP per month) forwarded with every search
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl PriceRange {
    /// Negative or non-finite bounds are treated as absent
    pub fn new(min_price: Option<f64>, max_price: Option<f64>) -> Self {
        Self {
            min_price: min_price.filter(|p| Self::is_valid(*p)),
            max_price: max_price.filter(|p| Self::is_valid(*p)),
        }
    }

    fn is_valid(price: f64) -> bool {
        price.is_finite() && price >= 0.0
    }
}

/// Parameters of a single page fetch. Built fresh for every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// City to search in
    pub city: CityName,
    /// 1-based page number
    pub page: u32,
    /// Price filter, sent as query parameters when present
    pub price: PriceRange,
}

impl SearchQuery {
    pub fn new(city: impl Into<CityName>, page: u32, price: PriceRange) -> Self {
        Self {
            city: city.into(),
            page: page.max(1),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_prices_are_not_serialized() {
        let json = serde_json::to_value(PriceRange::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_present_prices_use_camel_case() {
        let json = serde_json::to_value(PriceRange::new(Some(400.0), None)).unwrap();
        assert_eq!(json, serde_json::json!({ "minPrice": 400.0 }));

        let json = serde_json::to_value(PriceRange::new(Some(450.5), Some(900.0))).unwrap();
        assert_eq!(json, serde_json::json!({ "minPrice": 450.5, "maxPrice": 900.0 }));
    }

    #[test]
    fn test_invalid_bounds_are_dropped() {
        let range = PriceRange::new(Some(-10.0), Some(f64::NAN));
        assert_eq!(range, PriceRange::default());

        let range = PriceRange::new(Some(0.0), Some(f64::INFINITY));
        assert_eq!(range.min_price, Some(0.0));
        assert_eq!(range.max_price, None);
    }

    #[test]
    fn test_page_is_at_least_one() {
        let query = SearchQuery::new("York", 0, PriceRange::default());
        assert_eq!(query.page, 1);
    }
}
