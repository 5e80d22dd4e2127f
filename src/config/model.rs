//! Data structures for the gateway configuration.
//!
//! [`GatewayConfig`] is built once at startup from CLI flags and their
//! environment variables and never changes afterwards. It expands into
//! the list of [`Route`] registrations consumed by the route table.

use serde::Serialize;

pub const DEFAULT_AUTH_URL: &str = "http://localhost:8080";
pub const DEFAULT_CRUD_URL: &str = "http://localhost:8081";
pub const DEFAULT_PROFILE_URL: &str = "http://localhost:8083";
pub const DEFAULT_CALENDAR_URL: &str = "http://localhost:8084";
pub const DEFAULT_MEETING_URL: &str = "http://localhost:8085";
pub const DEFAULT_EMAIL_URL: &str = "http://localhost:8086";

/// Base URLs of the backend services.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceUrls {
    pub auth: String,
    pub crud: String,
    pub calendar: String,
    pub meeting: String,
    pub profile: String,
    pub email: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            auth: DEFAULT_AUTH_URL.into(),
            crud: DEFAULT_CRUD_URL.into(),
            calendar: DEFAULT_CALENDAR_URL.into(),
            meeting: DEFAULT_MEETING_URL.into(),
            profile: DEFAULT_PROFILE_URL.into(),
            email: DEFAULT_EMAIL_URL.into(),
        }
    }
}

/// How `/calendar-api` paths reach the calendar service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPathMode {
    /// Forward `/calendar-api/...` unchanged.
    #[default]
    Identity,
    /// Drop the `/calendar-api` prefix before forwarding.
    Strip,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GatewayConfig {
    pub services: ServiceUrls,
    pub calendar_mode: CalendarPathMode,
}

/// How the inbound path turns into the upstream path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Rewrite {
    Identity,
    StripPrefix,
    ReplacePrefix { with: String },
    Fixed { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// `/prefix` and anything below `/prefix/`.
    Prefix,
    /// `/prefix` only (a single trailing slash is tolerated).
    Exact,
}

/// Whether an upstream body must be JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Try JSON, fall back to the raw text.
    Lenient,
    /// JSON or fail.
    Strict,
}

#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub prefix: String,
    pub matching: Matching,
    pub methods: Vec<String>,
    pub service: &'static str,
    pub base_url: String,
    pub rewrite: Rewrite,
    pub decode: DecodePolicy,
    pub force_json: bool,
}

impl Route {
    fn prefixed(prefix: &str, service: &'static str, base_url: &str, rewrite: Rewrite) -> Self {
        Self {
            prefix: prefix.into(),
            matching: Matching::Prefix,
            methods: vec!["*".into()],
            service,
            base_url: base_url.into(),
            rewrite,
            decode: DecodePolicy::Lenient,
            force_json: false,
        }
    }

    fn fixed(
        prefix: &str,
        methods: &[&str],
        service: &'static str,
        base_url: &str,
        path: &str,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            matching: Matching::Exact,
            methods: methods.iter().map(|m| (*m).to_string()).collect(),
            service,
            base_url: base_url.into(),
            rewrite: Rewrite::Fixed { path: path.into() },
            decode: DecodePolicy::Strict,
            force_json: false,
        }
    }
}

impl GatewayConfig {
    /// Route registrations in declaration order.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        let s = &self.services;
        let calendar_rewrite = match self.calendar_mode {
            CalendarPathMode::Identity => Rewrite::Identity,
            CalendarPathMode::Strip => Rewrite::StripPrefix,
        };

        let mut login = Route::fixed("/login", &["POST"], "auth", &s.auth, "/api/login");
        login.force_json = true;

        vec![
            login,
            Route::fixed("/users", &["GET"], "auth", &s.auth, "/api/users"),
            Route::prefixed("/admin-api", "crud", &s.crud, Rewrite::Identity),
            Route::prefixed("/calendar-api", "calendar", &s.calendar, calendar_rewrite),
            Route::prefixed("/booking-api", "meeting", &s.meeting, Rewrite::Identity),
            Route::prefixed(
                "/profiles-api",
                "profile",
                &s.profile,
                Rewrite::ReplacePrefix {
                    with: "/profiles".into(),
                },
            ),
            Route::prefixed("/email-api", "email", &s.email, Rewrite::Identity),
            Route::prefixed("/api", "auth", &s.auth, Rewrite::Identity),
        ]
    }
}
