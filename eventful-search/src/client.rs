//! Eventful search client.
//!
//! Holds the application key and the endpoint, builds the request URL, runs a
//! single GET through a [`Transport`] and normalizes the body. There is no
//! retry and no caching; every call is independent.
use crate::error::SearchError;
use crate::normalize::normalize;
use crate::query::{build_search_url, DateFilterPolicy, SearchQuery, DEFAULT_ENDPOINT};
use crate::transport::Transport;
use crate::types::SearchResultPage;
use eventful_http::HttpClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct EventfulClient {
    api_key: String,
    endpoint: Url,
    policy: DateFilterPolicy,
    transport: Arc<dyn Transport>,
}

impl EventfulClient {
    /// Client for the public endpoint using the default HTTP transport.
    ///
    /// # Errors
    ///
    /// [`SearchError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Ok(Self::with_transport(api_key, Arc::new(HttpClient::new()?)))
    }

    /// Like [`EventfulClient::new`] with a request timeout other than the default.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let http = HttpClient::new()?.with_timeout(timeout);
        Ok(Self::with_transport(api_key, Arc::new(http)))
    }

    pub fn with_transport(api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).expect("default endpoint parses");
        Self {
            api_key: api_key.into(),
            endpoint,
            policy: DateFilterPolicy::default(),
            transport,
        }
    }

    /// Point the client at another deployment of the search endpoint.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidArgument`] unless `endpoint` is an absolute
    /// `http` or `https` URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, SearchError> {
        let url = Url::parse(endpoint)
            .map_err(|e| SearchError::InvalidArgument(format!("endpoint {endpoint:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::InvalidArgument(format!(
                "endpoint {endpoint:?} must use http or https"
            )));
        }
        self.endpoint = url;
        Ok(self)
    }

    pub fn with_date_filter_policy(mut self, policy: DateFilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn date_filter_policy(&self) -> DateFilterPolicy {
        self.policy
    }

    /// Search for events.
    ///
    /// `date_filter` follows the client's [`DateFilterPolicy`]; `radius` is in
    /// miles and is rejected when negative before any request is made.
    pub async fn search_events(
        &self,
        keywords: &str,
        date_filter: &str,
        location: &str,
        radius: i64,
        sort_order: &str,
    ) -> Result<SearchResultPage, SearchError> {
        let query = SearchQuery {
            keywords: keywords.to_owned(),
            date: date_filter.to_owned(),
            location: location.to_owned(),
            radius,
            sort_order: sort_order.to_owned(),
        };
        self.search(&query).await
    }

    /// [`EventfulClient::search_events`] taking a prepared [`SearchQuery`].
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultPage, SearchError> {
        let url = build_search_url(&self.endpoint, query, &self.api_key, self.policy)?;

        tracing::debug!(
            keywords = %query.keywords,
            location = %query.location,
            within = query.radius,
            sort_order = %query.sort_order,
            date_policy = ?self.policy,
            "eventful.search.start"
        );

        let body = self.transport.get(&url).await.map_err(|e| {
            tracing::warn!(error = ?e, "eventful.search.transport_error");
            SearchError::from(e)
        })?;

        let page = normalize(&body).map_err(|e| {
            tracing::warn!(error = ?e, body_len = body.len(), "eventful.search.decode_error");
            SearchError::from(e)
        })?;

        tracing::info!(
            total_items = page.total_items,
            page_number = page.page_number,
            page_count = page.page_count,
            events = page.events.len(),
            "eventful.search.decoded"
        );
        Ok(page)
    }
}

impl fmt::Debug for EventfulClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventfulClient")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> EventfulClient {
        EventfulClient::new("s3cret-key").unwrap()
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("s3cret-key"));
        assert!(rendered.contains("api.eventful.com"));
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(matches!(
            client().with_endpoint("ftp://example.test/search"),
            Err(SearchError::InvalidArgument(_))
        ));
        assert!(matches!(
            client().with_endpoint("not a url"),
            Err(SearchError::InvalidArgument(_))
        ));
        let ok = client()
            .with_endpoint("https://example.test/json/events/search")
            .unwrap();
        assert_eq!(ok.endpoint().host_str(), Some("example.test"));
    }

    #[test]
    fn legacy_date_policy_is_the_default() {
        assert_eq!(client().date_filter_policy(), DateFilterPolicy::Legacy);
        let corrected = client().with_date_filter_policy(DateFilterPolicy::WhenPresent);
        assert_eq!(corrected.date_filter_policy(), DateFilterPolicy::WhenPresent);
    }

    #[test]
    fn client_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<EventfulClient>();
    }
}
