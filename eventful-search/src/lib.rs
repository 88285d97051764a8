//! Client for the Eventful event-search API.
//!
//! [`EventfulClient::search_events`] builds the request URL ([`query`]), runs one
//! GET through a [`Transport`], and decodes the body ([`normalize`]) into a
//! [`SearchResultPage`]. The service is loose about its envelope: `events`
//! may be a bare array or wrapped as `{"event": [...]}`, and page counters and
//! image sizes arrive as quoted integers. Callers only ever see the clean shape.
//!
//! ```no_run
//! # async fn demo() -> Result<(), eventful_search::SearchError> {
//! let client = eventful_search::EventfulClient::new("APP_KEY")?;
//! let page = client.search_events("jazz", "", "Boston", 10, "date").await?;
//! for event in &page.events {
//!     println!("{} @ {}", event.title, event.venue_name);
//! }
//! # Ok(()) }
//! ```
pub mod client;
pub mod error;
pub mod normalize;
pub mod query;
pub mod transport;
pub mod types;
mod wire;

pub use client::EventfulClient;
pub use error::{DecodeError, SearchError};
pub use normalize::normalize;
pub use query::{build_search_url, DateFilterPolicy, SearchQuery};
pub use transport::Transport;
pub use types::{Event, Image, ImageSet, SearchResultPage};
