//! Request dispatch and the uniform failure wrapper.
//!
//! [`forward_handler`] is the Axum fallback that receives every
//! non-`/health` request. It matches the path against the
//! [`RouteTable`](routing::RouteTable), then runs the relay pipeline:
//! [`translate`] builds the outbound request, [`forward`] performs the
//! upstream call and [`relay`] turns the upstream response into the
//! caller's response. Any [`RelayError`] along the way becomes
//! `500 {"error": ...}`; an unmatched path is a plain 404.

pub mod forward;
pub mod headers;
pub mod payload;
pub mod relay;
pub mod routing;
pub mod translate;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::model::Route;
use crate::error::RelayError;
use crate::server::{AppState, HttpClient};
use payload::Payload;
use relay::RelayedResponse;
use translate::InboundRequest;

const CORRELATION_HEADER: &str = "x-correlation-id";

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();
    let correlation_id = req_headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let Some(route) = state.routes.match_route(path, method.as_str()) else {
        tracing::warn!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "no route matched"
        );
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = req_headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let payload = match Payload::from_inbound(content_type, &body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                path = %path,
                error = %e,
                "rejected malformed JSON body"
            );
            return error_body(StatusCode::BAD_REQUEST, "invalid JSON body");
        }
    };

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        service = route.service,
        "request received"
    );

    let inbound = InboundRequest {
        method: &method,
        path_and_query: uri.path_and_query().map_or(path, |pq| pq.as_str()),
        headers: &req_headers,
        body: &payload,
    };

    let result = run_pipeline(&state.http_client, &inbound, route, &correlation_id).await;
    state.stats.record(result.is_ok());
    let mut response = match result {
        Ok(relayed) => relayed.into_response(),
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                service = route.service,
                kind = e.kind(),
                error = ?e,
                "relay failed"
            );
            failure_response(&e)
        }
    };

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn run_pipeline(
    client: &HttpClient,
    inbound: &InboundRequest<'_>,
    route: &Route,
    correlation_id: &str,
) -> Result<RelayedResponse, RelayError> {
    let outbound = translate::translate(inbound, route)?;
    let upstream = forward::forward(client, outbound, correlation_id).await?;
    relay::relay(upstream, route.decode)
}

/// `500 {"error": <message>}` for every relay failure.
#[must_use]
pub fn failure_response(err: &RelayError) -> Response {
    error_body(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
