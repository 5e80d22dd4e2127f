//! Route registration validation with detailed error reporting.
//!
//! The [`validate`] function checks the route list produced by a
//! [`GatewayConfig`](super::model::GatewayConfig) for structural errors:
//! malformed prefixes, duplicate prefixes, bad HTTP methods, rewrite
//! targets that are not absolute paths, and malformed service base URLs.
//! Every problem is collected so startup reports them all at once.

use std::collections::HashSet;

use url::Url;

use super::model::{Rewrite, Route};
use crate::error::ValidationError;

pub const VALID_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "*",
];

/// Validate a route prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix cannot be empty".into());
    }
    if !prefix.starts_with('/') {
        return Err("prefix must start with '/'".into());
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err("prefix must not end with '/'".into());
    }
    if prefix.contains(['?', '#', '*']) {
        return Err("prefix must be a literal path".into());
    }
    Ok(())
}

/// Validate a service base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{url}' has no host"))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err(format!("'{url}' must not carry a query or fragment"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate an HTTP method string. Returns `Ok(())` or a human-readable error.
pub fn validate_method(method: &str) -> Result<(), String> {
    let upper = method.to_uppercase();
    if VALID_METHODS.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(format!("'{method}' is not a valid HTTP method"))
    }
}

fn validate_rewrite(rewrite: &Rewrite) -> Result<(), String> {
    let path = match rewrite {
        Rewrite::Identity | Rewrite::StripPrefix => return Ok(()),
        Rewrite::ReplacePrefix { with } => with,
        Rewrite::Fixed { path } => path,
    };
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(format!("rewrite target '{path}' must start with '/'"))
    }
}

pub fn validate(routes: &[Route]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if routes.is_empty() {
        errors.push(ValidationError {
            route: "(root)".into(),
            field: "routes".into(),
            message: "at least one route must be registered".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_prefixes = HashSet::new();

    for (i, route) in routes.iter().enumerate() {
        let route_id = if route.prefix.is_empty() {
            format!("routes[{i}]")
        } else {
            route.prefix.clone()
        };

        if let Err(msg) = validate_prefix(&route.prefix) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "prefix".into(),
                message: msg,
                suggestion: if !route.prefix.is_empty() && !route.prefix.starts_with('/') {
                    Some(format!("did you mean '/{}'?", route.prefix))
                } else {
                    None
                },
            });
        }

        if !seen_prefixes.insert(route.prefix.as_str()) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "prefix".into(),
                message: "duplicate route prefix".into(),
                suggestion: Some("register exactly one rewrite policy per prefix".into()),
            });
        }

        if route.methods.is_empty() {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "methods".into(),
                message: "at least one method must be allowed".into(),
                suggestion: Some("use '*' to accept any method".into()),
            });
        }

        for method in &route.methods {
            if let Err(msg) = validate_method(method) {
                errors.push(ValidationError {
                    route: route_id.clone(),
                    field: "methods".into(),
                    message: msg,
                    suggestion: None,
                });
            }
        }

        if let Err(msg) = validate_rewrite(&route.rewrite) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "rewrite".into(),
                message: msg,
                suggestion: None,
            });
        }

        if let Err(msg) = validate_base_url(&route.base_url) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: format!("{}.url", route.service),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
