//! Longest-prefix route matching and path rewriting.
//!
//! [`RouteTable`] validates the registrations once, then orders them by
//! prefix length so the most specific prefix is tried first regardless
//! of declaration order. A prefix only matches on a segment boundary:
//! `/api` matches `/api` and `/api/users` but never `/apis`.

use std::cmp::Reverse;

use crate::config::model::{GatewayConfig, Matching, Rewrite, Route};
use crate::config::validation::validate;
use crate::error::{GatewayError, ValidationError};

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Validate and index route registrations.
    pub fn new(mut routes: Vec<Route>) -> Result<Self, Vec<ValidationError>> {
        validate(&routes)?;
        // Stable sort keeps declaration order among equal-length prefixes.
        routes.sort_by_key(|r| Reverse(r.prefix.len()));
        Ok(Self { routes })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(config.routes()).map_err(|errors| GatewayError::ConfigValidation { errors })
    }

    /// Routes in matching order (most specific first).
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for a request path (without query string).
    #[must_use]
    pub fn match_route(&self, path: &str, method: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| path_matches(route, path) && method_matches(&route.methods, method))
    }
}

fn path_matches(route: &Route, path: &str) -> bool {
    let Some(rest) = path.strip_prefix(route.prefix.as_str()) else {
        return false;
    };
    match route.matching {
        Matching::Exact => rest.is_empty() || rest == "/",
        Matching::Prefix => rest.is_empty() || rest.starts_with('/') || route.prefix == "/",
    }
}

fn method_matches(methods: &[String], method: &str) -> bool {
    methods
        .iter()
        .any(|m| m == "*" || m.eq_ignore_ascii_case(method))
}

/// Rewrite an inbound path (query string included) for the upstream.
///
/// `path_and_query` must be the path the route was matched against.
#[must_use]
pub fn rewrite_path(route: &Route, path_and_query: &str) -> String {
    let rest = path_and_query
        .strip_prefix(route.prefix.as_str())
        .unwrap_or(path_and_query);

    match &route.rewrite {
        Rewrite::Identity => path_and_query.to_string(),
        Rewrite::StripPrefix => {
            if rest.starts_with('/') {
                rest.to_string()
            } else {
                format!("/{rest}")
            }
        }
        Rewrite::ReplacePrefix { with } => format!("{with}{rest}"),
        Rewrite::Fixed { path } => path.clone(),
    }
}
