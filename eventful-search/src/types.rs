//! Public result types returned by a search.
//!
//! Event fields stay as the strings the service sent. Only the page counters
//! and image dimensions are integers.
use serde::Serialize;

/// One page of search hits.
///
/// The counters are copied from the service as-is. In particular
/// `page_count` is not recomputed from `total_items` and `page_size`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResultPage {
    pub total_items: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub page_count: u64,
    /// Hits in the order the service returned them.
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    pub title: String,
    pub url: String,
    pub id: String,
    pub venue_id: String,
    pub venue_name: String,
    pub venue_url: String,
    pub start_time: String,
    pub stop_time: String,
    pub all_day: String,
    pub latitude: String,
    pub longitude: String,
    pub city_name: String,
    pub description: String,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSet>,
}

/// Primary image plus the optional resized variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSet {
    #[serde(flatten)]
    pub primary: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}
