//! Inbound to outbound request translation.

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use hyper::Uri;

use super::headers::build_outbound_headers;
use super::payload::Payload;
use super::routing::rewrite_path;
use crate::config::model::Route;
use crate::error::RelayError;

/// Read-only view of the caller's request.
#[derive(Debug)]
pub struct InboundRequest<'a> {
    pub method: &'a Method,
    pub path_and_query: &'a str,
    pub headers: &'a HeaderMap,
    pub body: &'a Payload,
}

#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// GET and HEAD never carry a body upstream.
#[must_use]
pub fn carries_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

pub fn translate(
    inbound: &InboundRequest<'_>,
    route: &Route,
) -> Result<OutboundRequest, RelayError> {
    let target = format!(
        "{}{}",
        route.base_url.trim_end_matches('/'),
        rewrite_path(route, inbound.path_and_query)
    );
    let uri: Uri = target.parse().map_err(|e: http::uri::InvalidUri| {
        RelayError::InvalidTarget {
            source: Box::new(e),
        }
    })?;

    let body = if carries_body(inbound.method) {
        let bytes = inbound
            .body
            .to_bytes()
            .map_err(|e| RelayError::InvalidTarget {
                source: Box::new(e),
            })?;
        Some(bytes)
    } else {
        None
    };

    Ok(OutboundRequest {
        method: inbound.method.clone(),
        uri,
        headers: build_outbound_headers(inbound.headers, route),
        body,
    })
}
