//! `portico health`: check the health of a running instance.
//!
//! The check goes out through the same client and forwarding path the
//! gateway uses for upstream calls, so `https://` instances work too.

use std::time::Duration;

use axum::http::{HeaderMap, Method, Uri};
use bytes::Bytes;

use crate::cli::HealthArgs;
use crate::error::GatewayError;
use crate::health::HealthResponse;
use crate::proxy::forward::forward;
use crate::proxy::translate::OutboundRequest;
use crate::server::build_http_client;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), GatewayError> {
    let body = fetch_health(&args.url).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    let health: HealthResponse =
        serde_json::from_slice(&body).map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;
    println!("\u{2713} portico is healthy ({})", args.url);
    println!("  version:  {} ({})", health.version, health.git);
    println!("  uptime:   {}", format_uptime(health.uptime_seconds));
    println!("  routes:   {}", health.routes);
    println!(
        "  requests: {} relayed, {} failed",
        health.stats.requests_relayed, health.stats.requests_failed
    );
    Ok(())
}

/// `GET {base_url}/health`; any non-2xx status is an error.
pub async fn fetch_health(base_url: &str) -> Result<Bytes, GatewayError> {
    let uri: Uri = format!("{}/health", base_url.trim_end_matches('/'))
        .parse()
        .map_err(|e: http::uri::InvalidUri| GatewayError::UriParse {
            source: Box::new(e),
        })?;
    let request = OutboundRequest {
        method: Method::GET,
        uri,
        headers: HeaderMap::new(),
        body: None,
    };

    let client = build_http_client();
    let call = forward(&client, request, "health-check");
    let response = tokio::time::timeout(HEALTH_TIMEOUT, call)
        .await
        .map_err(|_| GatewayError::HttpRequest {
            source: format!("no answer within {}s", HEALTH_TIMEOUT.as_secs()).into(),
        })?
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    if !response.status.is_success() {
        return Err(GatewayError::HealthCheckFailed(response.status));
    }
    Ok(response.body)
}

fn format_uptime(seconds: u64) -> String {
    match (seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}
