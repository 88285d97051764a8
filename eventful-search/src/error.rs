//! Error types surfaced by the search operation.

use eventful_http::HttpError;
use thiserror::Error;

/// Everything that can go wrong in one `search_events` call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Caller input rejected before any request was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The GET could not be completed or returned a non-2xx status.
    #[error("transport error")]
    Transport(#[from] HttpError),

    /// The response body did not match the search envelope.
    #[error("decode error")]
    Decode(#[from] DecodeError),
}

/// Failure to turn a response body into a `SearchResultPage`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, or a page counter missing or not an integer.
    #[error("invalid search response envelope")]
    Json(#[from] serde_json::Error),

    /// One hit in `events` could not be decoded; `index` is its position.
    #[error("invalid event at index {index}")]
    Event {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// `events` was neither an array nor an `{"event": ...}` wrapper.
    #[error("unexpected shape for `events`: {0}")]
    UnexpectedEventsShape(String),
}
