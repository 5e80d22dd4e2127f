//! Unified error types for Portico.
//!
//! [`GatewayError`] covers process-level failures (bad configuration,
//! bind errors, the `health` client). [`RelayError`] covers a single
//! relayed request and is always rendered by the dispatcher as a
//! `500 {"error": ...}` response. [`ValidationError`] reports one
//! problem found while building the route table.

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub route: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  route {}: {}: {}", self.route, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // infallible for String
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// Failure of one relayed request.
///
/// The `Display` output is what the caller sees in the `error` field, so
/// it never names the upstream. The boxed source keeps the detail for logs.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to build upstream request")]
    InvalidTarget {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream service unreachable")]
    UpstreamUnreachable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream returned a malformed response")]
    UpstreamDecodeFailure {
        #[source]
        source: serde_json::Error,
    },
}

impl RelayError {
    /// Short label used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "invalid_target",
            Self::UpstreamUnreachable { .. } => "upstream_unreachable",
            Self::UpstreamDecodeFailure { .. } => "upstream_decode_failure",
        }
    }
}
