//! Upstream response translation.
//!
//! The upstream status is always relayed verbatim, 4xx and 5xx included.
//! Lenient routes fall back to the raw body when it is not JSON; strict
//! routes turn a non-JSON body into [`RelayError::UpstreamDecodeFailure`].
//! Raw bodies keep the upstream `Content-Type`.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use super::forward::OutboundResponse;
use super::payload::Payload;
use crate::config::model::DecodePolicy;
use crate::error::RelayError;

#[derive(Debug)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Payload,
}

pub fn relay(
    response: OutboundResponse,
    policy: DecodePolicy,
) -> Result<RelayedResponse, RelayError> {
    let body = match policy {
        DecodePolicy::Lenient => Payload::decode(&response.body),
        DecodePolicy::Strict => serde_json::from_slice(&response.body)
            .map(Payload::Structured)
            .map_err(|source| RelayError::UpstreamDecodeFailure { source })?,
    };

    Ok(RelayedResponse {
        status: response.status,
        content_type: response.content_type,
        body,
    })
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let (fallback, body) = match self.body {
            Payload::Structured(value) => return (self.status, Json(value)).into_response(),
            Payload::Raw(text) => ("text/plain; charset=utf-8", Bytes::from(text)),
            Payload::Binary(bytes) => ("application/octet-stream", bytes),
        };
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(fallback));
        (self.status, [(CONTENT_TYPE, content_type)], body).into_response()
    }
}
