//! Outbound header construction.
//!
//! Only `Authorization` and `Content-Type` cross the gateway. Everything
//! else (cookies, `Accept-Encoding`, hop-by-hop headers, `Host`) is
//! dropped. The `/login` route always sends `application/json`.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};

use crate::config::model::Route;

pub fn build_outbound_headers(original: &HeaderMap, route: &Route) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(auth) = original.get(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, auth.clone());
    }

    if route.force_json {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    } else if let Some(content_type) = original.get(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, content_type.clone());
    }

    headers
}
