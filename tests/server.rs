//! End-to-end tests: a real gateway relaying to in-process mock upstreams.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use portico::config::model::{CalendarPathMode, GatewayConfig, ServiceUrls};
use portico::health::HealthResponse;
use portico::proxy::routing::RouteTable;
use portico::server::{self, AppState};

fn header(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

/// Canned responses for the scenarios under test; anything else echoes
/// what the upstream received.
async fn upstream_handler(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    match (method.as_str(), uri.path()) {
        ("GET", "/booking-api/appointments") => Json(json!({"ok": true})).into_response(),
        ("POST", "/admin-api/users") => (StatusCode::CREATED, "user created").into_response(),
        (_, "/calendar-api/unknown") => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        ("GET", "/admin-api/report") => {
            (StatusCode::BAD_GATEWAY, Html("<h1>report offline</h1>")).into_response()
        }
        ("POST", "/admin-api/avatar") => {
            let content_type = header(&headers, "content-type");
            let content_type = content_type.as_str().unwrap_or("application/octet-stream");
            (StatusCode::OK, [(CONTENT_TYPE, content_type.to_string())], body).into_response()
        }
        (_, "/api/forbidden") => {
            (StatusCode::FORBIDDEN, Json(json!({"message": "nope"}))).into_response()
        }
        _ => Json(json!({
            "method": method.as_str(),
            "uri": uri.to_string(),
            "authorization": header(&headers, "authorization"),
            "content_type": header(&headers, "content-type"),
            "cookie": header(&headers, "cookie"),
            "body": String::from_utf8_lossy(&body),
        }))
        .into_response(),
    }
}

async fn text_upstream_handler() -> &'static str {
    "<html>maintenance</html>"
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn start_upstream() -> String {
    let addr = spawn(Router::new().fallback(upstream_handler)).await;
    format!("http://{addr}")
}

async fn start_text_upstream() -> String {
    let addr = spawn(Router::new().fallback(text_upstream_handler)).await;
    format!("http://{addr}")
}

/// A base URL nothing listens on.
async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn all_services(base: &str) -> ServiceUrls {
    ServiceUrls {
        auth: base.into(),
        crud: base.into(),
        calendar: base.into(),
        meeting: base.into(),
        profile: base.into(),
        email: base.into(),
    }
}

async fn start_gateway(config: GatewayConfig) -> (String, tokio::sync::oneshot::Sender<()>) {
    let routes = RouteTable::from_config(&config).unwrap();
    let router = server::build_router(Arc::new(AppState::new(routes)), 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (format!("http://{addr}"), shutdown_tx)
}

async fn gateway_to_echo() -> (String, tokio::sync::oneshot::Sender<()>) {
    let upstream = start_upstream().await;
    start_gateway(GatewayConfig {
        services: all_services(&upstream),
        ..GatewayConfig::default()
    })
    .await
}

#[tokio::test]
async fn health_endpoint_returns_healthy() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::get(format!("{gateway}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let health: HealthResponse = resp.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.routes, 8);
    assert_eq!(health.stats.requests_relayed, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unmatched_route_returns_404() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::get(format!("{gateway}/nonexistent")).await.unwrap();
    assert_eq!(resp.status(), 404);

    // Fixed-target routes only accept their own method.
    let resp = reqwest::get(format!("{gateway}/login")).await.unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn booking_json_is_relayed() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::get(format!("{gateway}/booking-api/appointments?professor=x"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"ok": true}));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn admin_post_relays_raw_text_and_status() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::Client::new()
        .post(format!("{gateway}/admin-api/users"))
        .json(&json!({"name": "Ada", "role": "professor"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(resp.text().await.unwrap(), "user created");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn users_answers_get_only() {
    let (gateway, shutdown) = gateway_to_echo().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{gateway}/users")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let echo: Value = resp.json().await.unwrap();
    assert_eq!(echo["uri"], "/api/users");

    let resp = client.head(format!("{gateway}/users")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let health: HealthResponse = reqwest::get(format!("{gateway}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.stats.requests_relayed, 1);
    assert_eq!(health.stats.requests_failed, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn html_error_page_keeps_its_media_type() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::get(format!("{gateway}/admin-api/report")).await.unwrap();
    assert_eq!(resp.status(), 502);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(resp.text().await.unwrap(), "<h1>report offline</h1>");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn binary_upload_round_trips_untouched() {
    let (gateway, shutdown) = gateway_to_echo().await;
    let image: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00, 0xfe];

    let resp = reqwest::Client::new()
        .post(format!("{gateway}/admin-api/avatar"))
        .header("content-type", "image/png")
        .body(image.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), image.as_slice());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn upstream_not_found_is_relayed_not_wrapped() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::get(format!("{gateway}/calendar-api/unknown"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.text().await.unwrap(), "Not Found");

    let resp = reqwest::get(format!("{gateway}/api/forbidden")).await.unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"message": "nope"}));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn only_authorization_and_content_type_cross() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let echo: Value = reqwest::Client::new()
        .get(format!("{gateway}/api/me"))
        .header("authorization", "Bearer token-123")
        .header("cookie", "session=abc")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["authorization"], "Bearer token-123");
    assert_eq!(echo["cookie"], Value::Null);
    assert_eq!(echo["uri"], "/api/me");

    let echo: Value = reqwest::get(format!("{gateway}/api/me"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["authorization"], Value::Null);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn get_never_forwards_a_body() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let echo: Value = reqwest::Client::new()
        .get(format!("{gateway}/admin-api/users/search?q=a"))
        .json(&json!({"ignored": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["uri"], "/admin-api/users/search?q=a");
    assert_eq!(echo["body"], "");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn mutating_body_is_reserialized() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let echo: Value = reqwest::Client::new()
        .put(format!("{gateway}/email-api/booking"))
        .json(&json!({"to": "prof@example.edu", "slot": 3}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["content_type"], "application/json");
    let sent: Value = serde_json::from_str(echo["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({"to": "prof@example.edu", "slot": 3}));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn profiles_prefix_is_replaced() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let echo: Value = reqwest::get(format!("{gateway}/profiles-api/123/schedule"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["uri"], "/profiles/123/schedule");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn login_goes_to_fixed_path_as_json() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let echo: Value = reqwest::Client::new()
        .post(format!("{gateway}/login"))
        .header("content-type", "text/plain")
        .header("authorization", "Basic dTpw")
        .body(r#"{"email":"a@b.c","password":"pw"}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["uri"], "/api/login");
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["content_type"], "application/json");
    assert_eq!(echo["authorization"], "Basic dTpw");
    assert_eq!(echo["body"], r#"{"email":"a@b.c","password":"pw"}"#);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn calendar_strip_mode_drops_prefix() {
    let upstream = start_upstream().await;
    let (gateway, shutdown) = start_gateway(GatewayConfig {
        services: all_services(&upstream),
        calendar_mode: CalendarPathMode::Strip,
    })
    .await;

    let echo: Value = reqwest::get(format!("{gateway}/calendar-api/api/calendar/events?day=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["uri"], "/api/calendar/events?day=1");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn strict_route_with_text_body_is_a_gateway_error() {
    let text = start_text_upstream().await;
    let (gateway, shutdown) = start_gateway(GatewayConfig {
        services: all_services(&text),
        ..GatewayConfig::default()
    })
    .await;

    let resp = reqwest::get(format!("{gateway}/users")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "upstream returned a malformed response"}));

    // The lenient catch-all relays the same text untouched.
    let resp = reqwest::get(format!("{gateway}/api/users")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "<html>maintenance</html>");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unreachable_upstream_is_500_without_topology() {
    let dead = dead_upstream().await;
    let port = dead.rsplit(':').next().unwrap().to_string();
    let (gateway, shutdown) = start_gateway(GatewayConfig {
        services: all_services(&dead),
        ..GatewayConfig::default()
    })
    .await;

    let resp = reqwest::get(format!("{gateway}/booking-api/bookings"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert_eq!(message, "upstream service unreachable");
    assert!(!message.contains("127.0.0.1"));
    assert!(!message.contains(&port));

    let health: HealthResponse = reqwest::get(format!("{gateway}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.stats.requests_failed, 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn malformed_json_body_is_rejected_at_the_boundary() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::Client::new()
        .post(format!("{gateway}/admin-api/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn correlation_id_is_returned() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let resp = reqwest::Client::new()
        .get(format!("{gateway}/booking-api/appointments"))
        .header("x-correlation-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-correlation-id").unwrap(), "trace-42");

    let resp = reqwest::get(format!("{gateway}/booking-api/appointments"))
        .await
        .unwrap();
    assert!(resp.headers().contains_key("x-correlation-id"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (gateway, shutdown) = gateway_to_echo().await;

    let url = format!("{gateway}/health");
    assert!(reqwest::get(&url).await.is_ok());

    let _ = shutdown.send(());
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(reqwest::get(&url).await.is_err());
}
