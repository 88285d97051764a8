//! Literal wire shape of the `/json/events/search` response.
//!
//! Nothing here is exported from the crate. The normalizer parses into these
//! types and then maps them onto [`crate::types`].
use crate::error::DecodeError;
use serde::de::{self, DeserializeOwned, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(deserialize_with = "int_as_string")]
    pub total_items: u64,
    #[serde(deserialize_with = "int_as_string")]
    pub page_number: u64,
    #[serde(deserialize_with = "int_as_string")]
    pub page_size: u64,
    #[serde(deserialize_with = "int_as_string")]
    pub page_count: u64,
    /// Resolved separately by [`RawEvents::resolve`] so a bad shape can be named.
    #[serde(default)]
    pub events: Value,
}

/// The `events` field after its shape has been identified.
#[derive(Debug, PartialEq)]
pub(crate) enum RawEvents {
    /// `null` or missing: the service sends this for zero hits.
    Absent,
    /// `[ {...}, ... ]`
    List(Vec<RawEvent>),
    /// `{ "event": [ {...}, ... ] }` or `{ "event": {...} }`
    Wrapped(Vec<RawEvent>),
}

const WRAPPER_KEY: &str = "event";

impl RawEvents {
    pub fn resolve(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(Self::Absent),
            Value::Array(items) => parse_events(items).map(Self::List),
            Value::Object(map) => Self::unwrap(map),
            other => Err(DecodeError::UnexpectedEventsShape(describe(&other))),
        }
    }

    fn unwrap(mut map: Map<String, Value>) -> Result<Self, DecodeError> {
        if map.len() != 1 || !map.contains_key(WRAPPER_KEY) {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(DecodeError::UnexpectedEventsShape(if keys.is_empty() {
                "empty object".to_string()
            } else {
                format!("object with keys {keys:?}")
            }));
        }
        match map.remove(WRAPPER_KEY).unwrap_or(Value::Null) {
            Value::Array(items) => parse_events(items).map(Self::Wrapped),
            single @ Value::Object(_) => parse_events(vec![single]).map(Self::Wrapped),
            Value::Null => Ok(Self::Wrapped(Vec::new())),
            other => Err(DecodeError::UnexpectedEventsShape(format!(
                "`{WRAPPER_KEY}` wrapper holding {}",
                describe(&other)
            ))),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::List(_) => "list",
            Self::Wrapped(_) => "wrapped",
        }
    }

    pub fn into_events(self) -> Vec<RawEvent> {
        match self {
            Self::Absent => Vec::new(),
            Self::List(events) | Self::Wrapped(events) => events,
        }
    }
}

fn parse_events(items: Vec<Value>) -> Result<Vec<RawEvent>, DecodeError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawEvent>(item)
                .map_err(|source| DecodeError::Event { index, source })
        })
        .collect()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RawEvent {
    #[serde(deserialize_with = "opaque_string")]
    pub title: String,
    #[serde(deserialize_with = "opaque_string")]
    pub url: String,
    #[serde(deserialize_with = "opaque_string")]
    pub id: String,
    #[serde(deserialize_with = "opaque_string")]
    pub venue_id: String,
    #[serde(deserialize_with = "opaque_string")]
    pub venue_name: String,
    #[serde(deserialize_with = "opaque_string")]
    pub venue_url: String,
    #[serde(deserialize_with = "opaque_string")]
    pub start_time: String,
    #[serde(deserialize_with = "opaque_string")]
    pub stop_time: String,
    #[serde(deserialize_with = "opaque_string")]
    pub all_day: String,
    #[serde(deserialize_with = "opaque_string")]
    pub latitude: String,
    #[serde(deserialize_with = "opaque_string")]
    pub longitude: String,
    #[serde(deserialize_with = "opaque_string")]
    pub city_name: String,
    #[serde(deserialize_with = "opaque_string")]
    pub description: String,
    #[serde(deserialize_with = "opaque_string")]
    pub created: String,
    #[serde(deserialize_with = "image_or_none")]
    pub image: Option<RawImageSet>,
}

/// The primary image's fields sit at the top level next to the variants.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RawImageSet {
    #[serde(deserialize_with = "opaque_string")]
    pub url: String,
    #[serde(deserialize_with = "int_as_string_or_zero")]
    pub width: u32,
    #[serde(deserialize_with = "int_as_string_or_zero")]
    pub height: u32,
    #[serde(deserialize_with = "image_or_none")]
    pub small: Option<RawImage>,
    #[serde(deserialize_with = "image_or_none")]
    pub medium: Option<RawImage>,
    #[serde(deserialize_with = "image_or_none")]
    pub thumb: Option<RawImage>,
}

/// Image objects that may carry size variants as nested objects.
pub(crate) trait ImageObject: DeserializeOwned {
    const VARIANTS: &'static [&'static str];
}

impl ImageObject for RawImageSet {
    const VARIANTS: &'static [&'static str] = &["small", "medium", "thumb"];
}

impl ImageObject for RawImage {
    const VARIANTS: &'static [&'static str] = &[];
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct RawImage {
    #[serde(deserialize_with = "opaque_string")]
    pub url: String,
    #[serde(deserialize_with = "int_as_string_or_zero")]
    pub width: u32,
    #[serde(deserialize_with = "int_as_string_or_zero")]
    pub height: u32,
}

// ==============================
// Int-as-string
// ==============================

/// Accepts `"42"` or `42`. Anything else, including `null`, is an error.
pub(crate) fn int_as_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64> + Default,
{
    deserializer.deserialize_any(IntAsString::<T> {
        null_is_zero: false,
        marker: PhantomData,
    })
}

/// Same rule as [`int_as_string`], but `null` reads as zero.
pub(crate) fn int_as_string_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64> + Default,
{
    deserializer.deserialize_any(IntAsString::<T> {
        null_is_zero: true,
        marker: PhantomData,
    })
}

struct IntAsString<T> {
    null_is_zero: bool,
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for IntAsString<T>
where
    T: FromStr + TryFrom<u64> + Default,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string containing one")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.parse::<T>()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        if self.null_is_zero {
            Ok(T::default())
        } else {
            Err(E::invalid_type(Unexpected::Unit, &self))
        }
    }
}

// ==============================
// Opaque strings and optional images
// ==============================

/// Strings pass through; `null` becomes `""`; numbers and booleans keep their JSON text.
fn opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::invalid_type(
            Unexpected::Other(&describe(&other)),
            &"a string",
        )),
    }
}

/// Non-objects read as absent, and so does an object with a malformed field.
/// A `width` or `height` that is not an integer still fails the decode.
fn image_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: ImageObject,
{
    let obj = match Value::deserialize(deserializer)? {
        Value::Object(obj) => obj,
        _ => return Ok(None),
    };
    check_dimensions(&obj).map_err(<D::Error as de::Error>::custom)?;
    for variant in T::VARIANTS {
        if let Some(Value::Object(nested)) = obj.get(*variant) {
            check_dimensions(nested)
                .map_err(|e| <D::Error as de::Error>::custom(format!("{variant}: {e}")))?;
        }
    }
    match serde_json::from_value(Value::Object(obj)) {
        Ok(image) => Ok(Some(image)),
        Err(error) => {
            tracing::debug!(%error, "eventful.response.image_dropped");
            Ok(None)
        }
    }
}

fn check_dimensions(obj: &Map<String, Value>) -> Result<(), serde_json::Error> {
    for key in ["width", "height"] {
        if let Some(v) = obj.get(key) {
            int_as_string_or_zero::<_, u32>(v).map_err(|e| {
                <serde_json::Error as de::Error>::custom(format!("{key}: {e}"))
            })?;
        }
    }
    Ok(())
}
