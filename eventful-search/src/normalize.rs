//! Turns a raw response body into a [`SearchResultPage`].
use crate::error::DecodeError;
use crate::types::{Event, Image, ImageSet, SearchResultPage};
use crate::wire::{RawEnvelope, RawEvent, RawEvents, RawImage, RawImageSet};

/// Decode one search response.
///
/// The four page counters are copied through untouched and events keep the
/// order they arrived in. `events` may be a bare array or an
/// `{"event": [...]}` wrapper; both produce the same page.
///
/// # Errors
///
/// [`DecodeError::Json`] when the body is not JSON or a counter is not an
/// integer. [`DecodeError::Event`] when a hit has a field of the wrong type
/// or an image dimension that is not an integer; a malformed image is
/// dropped instead. [`DecodeError::UnexpectedEventsShape`] when `events` is
/// neither shape.
pub fn normalize(raw: &[u8]) -> Result<SearchResultPage, DecodeError> {
    let envelope: RawEnvelope = serde_json::from_slice(raw)?;
    let events = RawEvents::resolve(envelope.events)?;

    tracing::debug!(
        shape = events.shape(),
        total_items = envelope.total_items,
        "eventful.response.events_shape"
    );

    Ok(SearchResultPage {
        total_items: envelope.total_items,
        page_number: envelope.page_number,
        page_size: envelope.page_size,
        page_count: envelope.page_count,
        events: events.into_events().into_iter().map(Event::from).collect(),
    })
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        Self {
            title: raw.title,
            url: raw.url,
            id: raw.id,
            venue_id: raw.venue_id,
            venue_name: raw.venue_name,
            venue_url: raw.venue_url,
            start_time: raw.start_time,
            stop_time: raw.stop_time,
            all_day: raw.all_day,
            latitude: raw.latitude,
            longitude: raw.longitude,
            city_name: raw.city_name,
            description: raw.description,
            created: raw.created,
            image: raw.image.map(ImageSet::from),
        }
    }
}

impl From<RawImageSet> for ImageSet {
    fn from(raw: RawImageSet) -> Self {
        Self {
            primary: Image {
                url: raw.url,
                width: raw.width,
                height: raw.height,
            },
            small: raw.small.map(Image::from),
            medium: raw.medium.map(Image::from),
            thumb: raw.thumb.map(Image::from),
        }
    }
}

impl From<RawImage> for Image {
    fn from(raw: RawImage) -> Self {
        Self {
            url: raw.url,
            width: raw.width,
            height: raw.height,
        }
    }
}
