//! Search parameters and the request URL built from them.
use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://api.eventful.com/json/events/search";

/// When the `date` parameter is sent.
///
/// `Legacy` keeps the long-standing behavior of the Eventful client this crate
/// replaces: `date=` is sent only when the caller's filter is empty, and a
/// non-empty filter is dropped. `WhenPresent` sends `date=<filter>` exactly
/// when the filter is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilterPolicy {
    #[default]
    Legacy,
    WhenPresent,
}

impl DateFilterPolicy {
    fn date_param(self, filter: &str) -> Option<&str> {
        match self {
            Self::Legacy => filter.is_empty().then_some(filter),
            Self::WhenPresent => (!filter.is_empty()).then_some(filter),
        }
    }
}

/// Caller input for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: String,
    /// Eventful date expression such as `Future`, `This Week` or `2013011800-2013012000`.
    pub date: String,
    pub location: String,
    /// Miles around `location`, sent as `within`. Must not be negative.
    pub radius: i64,
    /// Passed through unchecked; the service knows `relevance`, `date`,
    /// `popularity`, `title` and `venue_name`.
    pub sort_order: String,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Default::default()
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn radius(mut self, radius: i64) -> Self {
        self.radius = radius;
        self
    }

    pub fn sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = sort_order.into();
        self
    }
}

/// Build the search URL for `query` against `endpoint`.
///
/// Every value is form-encoded on its own, so `&`, `=`, spaces and
/// non-ASCII text cannot change the shape of the query string. Any query
/// already on `endpoint` is replaced.
///
/// ```
/// use eventful_search::query::{build_search_url, DateFilterPolicy, SearchQuery, DEFAULT_ENDPOINT};
/// use url::Url;
///
/// let endpoint = Url::parse(DEFAULT_ENDPOINT).unwrap();
/// let query = SearchQuery::new("jazz").location("Boston").radius(10).sort_order("date");
/// let url = build_search_url(&endpoint, &query, "KEY", DateFilterPolicy::Legacy).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "http://api.eventful.com/json/events/search?app_key=KEY&date=&keywords=jazz&location=Boston&within=10&sort_order=date"
/// );
/// ```
///
/// # Errors
///
/// [`SearchError::InvalidArgument`] when `radius` is negative.
pub fn build_search_url(
    endpoint: &Url,
    query: &SearchQuery,
    api_key: &str,
    policy: DateFilterPolicy,
) -> Result<Url, SearchError> {
    if query.radius < 0 {
        return Err(SearchError::InvalidArgument(format!(
            "radius must be non-negative, got {}",
            query.radius
        )));
    }

    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("app_key", api_key);
        if let Some(date) = policy.date_param(&query.date) {
            pairs.append_pair("date", date);
        }
        pairs
            .append_pair("keywords", &query.keywords)
            .append_pair("location", &query.location)
            .append_pair("within", &query.radius.to_string())
            .append_pair("sort_order", &query.sort_order);
    }
    Ok(url)
}
