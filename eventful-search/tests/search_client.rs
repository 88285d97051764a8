mod common;

use async_trait::async_trait;
use eventful_http::{HttpError, StatusCode};
use eventful_search::{
    DateFilterPolicy, DecodeError, EventfulClient, SearchError, SearchQuery, Transport,
};
use std::sync::{Arc, Mutex};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replays one canned body and remembers every URL it was asked for.
struct CannedTransport {
    body: Vec<u8>,
    seen: Mutex<Vec<Url>>,
}

impl CannedTransport {
    fn new(body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            body,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Url> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        self.seen.lock().unwrap().push(url.clone());
        Ok(self.body.clone())
    }
}

struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn get(&self, _url: &Url) -> Result<Vec<u8>, HttpError> {
        Err(HttpError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "Bad Gateway".into(),
            request_id: "-".into(),
        })
    }
}

#[tokio::test]
async fn decodes_wrapped_fixture() {
    common::init_test_tracing();
    let transport = CannedTransport::new(common::fixture("boston_jazz.json"));
    let client = EventfulClient::with_transport("KEY", transport.clone());

    let page = client
        .search_events("jazz", "", "Boston", 10, "date")
        .await
        .expect("fixture decodes");

    assert_eq!(page.total_items, 137);
    assert_eq!(page.page_number, 1);
    assert_eq!(page.page_size, 2);
    assert_eq!(page.page_count, 69);
    assert_eq!(page.events.len(), 2);

    let wallys = &page.events[0];
    assert_eq!(wallys.title, "Wally's Jam");
    assert_eq!(wallys.venue_id, "V0-001-000104270-1");
    assert_eq!(wallys.stop_time, "");
    let image = wallys.image.as_ref().expect("image set");
    assert_eq!(image.primary.width, 48);
    assert_eq!(image.medium.as_ref().map(|m| m.height), Some(128));
    assert_eq!(
        image.thumb.as_ref().map(|t| t.url.as_str()),
        Some("http://s1.evcdn.com/images/thumb/I0-001/004/074/713-3.jpeg")
    );

    let big_band = &page.events[1];
    assert_eq!(big_band.title, "Berklee Big Band");
    assert_eq!(big_band.description, "");
    assert_eq!(big_band.image, None);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].query(),
        Some("app_key=KEY&date=&keywords=jazz&location=Boston&within=10&sort_order=date")
    );
}

#[tokio::test]
async fn negative_radius_never_reaches_the_transport() {
    let transport = CannedTransport::new(Vec::new());
    let client = EventfulClient::with_transport("KEY", transport.clone());

    let err = client
        .search_events("jazz", "", "Boston", -5, "date")
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::InvalidArgument(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn corrected_policy_forwards_the_date() {
    let transport = CannedTransport::new(
        br#"{"total_items":"0","page_number":"1","page_size":"10","page_count":"0","events":null}"#
            .to_vec(),
    );
    let client = EventfulClient::with_transport("KEY", transport.clone())
        .with_date_filter_policy(DateFilterPolicy::WhenPresent);

    let page = client
        .search(&SearchQuery::new("jazz").date("This Week").radius(5))
        .await
        .unwrap();

    assert!(page.events.is_empty());
    let sent: Vec<(String, String)> = transport.requests()[0].query_pairs().into_owned().collect();
    assert!(sent.contains(&("date".to_string(), "This Week".to_string())));
}

#[tokio::test]
async fn transport_failures_are_not_masked() {
    let client = EventfulClient::with_transport("KEY", Arc::new(FailingTransport));
    let err = client
        .search_events("jazz", "", "Boston", 10, "date")
        .await
        .unwrap_err();

    match err {
        SearchError::Transport(HttpError::Api { status, .. }) => assert_eq!(status.as_u16(), 502),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let transport = CannedTransport::new(b"<html>maintenance</html>".to_vec());
    let client = EventfulClient::with_transport("KEY", transport);

    let err = client
        .search_events("jazz", "", "Boston", 10, "date")
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Decode(DecodeError::Json(_))));
}

#[tokio::test]
async fn end_to_end_over_http() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/events/search"))
        .and(query_param("app_key", "a&b=c"))
        .and(query_param("keywords", "rock & roll"))
        .and(query_param("location", "São Paulo"))
        .and(query_param("within", "25"))
        .and(query_param("sort_order", "relevance"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json; charset=utf-8")
                .set_body_bytes(common::fixture("boston_jazz.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = EventfulClient::new("a&b=c")
        .unwrap()
        .with_endpoint(&format!("{}/json/events/search", server.uri()))
        .unwrap();

    let page = client
        .search_events("rock & roll", "", "São Paulo", 25, "relevance")
        .await
        .expect("search succeeds");

    assert_eq!(page.events.len(), 2);
    assert_eq!(page.events[0].id, "E0-001-053459836-4");
}

#[tokio::test]
async fn http_error_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"error":"1","status":"Authentication Error","description":"A valid application key is required."}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = EventfulClient::new("bad-key")
        .unwrap()
        .with_endpoint(&format!("{}/json/events/search", server.uri()))
        .unwrap();

    let err = client
        .search_events("jazz", "", "Boston", 10, "date")
        .await
        .unwrap_err();

    match err {
        SearchError::Transport(HttpError::Api {
            status, message, ..
        }) => {
            assert_eq!(status.as_u16(), 403);
            assert!(message.starts_with("Authentication Error"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_searches_share_one_client() {
    let transport = CannedTransport::new(common::fixture("boston_jazz.json"));
    let client = EventfulClient::with_transport("KEY", transport.clone());

    let mut handles = Vec::new();
    for radius in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.search_events("jazz", "", "Boston", radius, "date").await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().total_items, 137);
    }
    assert_eq!(transport.requests().len(), 8);
}
