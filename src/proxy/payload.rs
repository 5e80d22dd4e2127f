//! Request and response bodies as a tagged variant.
//!
//! A [`Payload`] is decoded JSON, raw text, or opaque bytes when the body
//! is not UTF-8. Inbound bodies are parsed once at the boundary by
//! [`Payload::from_inbound`]; upstream bodies go through
//! [`Payload::decode`], where a failed JSON parse is an ordinary outcome
//! that yields [`Payload::Raw`] or [`Payload::Binary`].

use bytes::Bytes;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Structured(Value),
    Raw(String),
    Binary(Bytes),
}

impl Payload {
    /// Parse an inbound request body.
    ///
    /// JSON content types must carry valid JSON. An empty body becomes an
    /// empty object. Any other content type is kept byte for byte.
    pub fn from_inbound(
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Structured(Value::Object(serde_json::Map::new())));
        }
        if content_type.is_some_and(is_json_media_type) {
            serde_json::from_slice(body).map(Self::Structured)
        } else {
            Ok(Self::unstructured(body))
        }
    }

    /// Decode an upstream body, falling back to raw text or bytes.
    #[must_use]
    pub fn decode(body: &[u8]) -> Self {
        serde_json::from_slice(body).map_or_else(|_| Self::unstructured(body), Self::Structured)
    }

    fn unstructured(body: &[u8]) -> Self {
        match std::str::from_utf8(body) {
            Ok(text) => Self::Raw(text.to_owned()),
            Err(_) => Self::Binary(Bytes::copy_from_slice(body)),
        }
    }

    /// Serialize for transmission.
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        match self {
            Self::Structured(value) => serde_json::to_vec(value).map(Bytes::from),
            Self::Raw(text) => Ok(Bytes::from(text.clone())),
            Self::Binary(bytes) => Ok(bytes.clone()),
        }
    }
}

/// `application/json` or any `+json` structured suffix, parameters ignored.
#[must_use]
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
