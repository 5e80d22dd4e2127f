//! Single outbound call to the selected backend.
//!
//! One request in, one upstream call out. No retries and no deadline
//! beyond the transport defaults: an upstream that never answers keeps
//! the inbound request open.

use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};

use super::translate::OutboundRequest;
use crate::error::RelayError;
use crate::server::HttpClient;

#[derive(Debug)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward(
    client: &HttpClient,
    outbound: OutboundRequest,
    correlation_id: &str,
) -> Result<OutboundResponse, RelayError> {
    let target = outbound.uri.to_string();
    let start = Instant::now();

    let mut req_builder = hyper::Request::builder()
        .method(outbound.method)
        .uri(outbound.uri);
    for (key, value) in &outbound.headers {
        req_builder = req_builder.header(key, value);
    }

    let req = req_builder
        .body(Full::new(outbound.body.unwrap_or_default()))
        .map_err(|e| RelayError::InvalidTarget {
            source: Box::new(e),
        })?;

    let result = send(client, req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(response) => tracing::info!(
            correlation_id = %correlation_id,
            target = %target,
            status = response.status.as_u16(),
            bytes = response.body.len(),
            latency_ms,
            "upstream responded"
        ),
        Err(e) => tracing::warn!(
            correlation_id = %correlation_id,
            target = %target,
            error = ?e,
            latency_ms,
            "upstream call failed"
        ),
    }

    result
}

async fn send(
    client: &HttpClient,
    req: hyper::Request<Full<Bytes>>,
) -> Result<OutboundResponse, RelayError> {
    let response = client
        .request(req)
        .await
        .map_err(|e| RelayError::UpstreamUnreachable {
            source: Box::new(e),
        })?;
    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| RelayError::UpstreamUnreachable {
            source: Box::new(e),
        })?
        .to_bytes();
    Ok(OutboundResponse {
        status,
        content_type,
        body,
    })
}
