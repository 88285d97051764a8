//! The one thing the client needs from the network.
use async_trait::async_trait;
use eventful_http::{HttpClient, HttpError, RequestOpts};
use url::Url;

/// Performs a single GET and hands back the complete body.
///
/// Implementations must not retry. A non-2xx status is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        self.get_bytes(url, RequestOpts::default()).await
    }
}
