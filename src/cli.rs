//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, routes, health), and their argument structs.
//! Every flag has an environment variable equivalent for container
//! deployments; [`ServiceArgs`] is the only place backend base URLs
//! are read from the environment.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::{
    CalendarPathMode, GatewayConfig, ServiceUrls, DEFAULT_AUTH_URL, DEFAULT_CALENDAR_URL,
    DEFAULT_CRUD_URL, DEFAULT_EMAIL_URL, DEFAULT_MEETING_URL, DEFAULT_PROFILE_URL,
};

#[derive(Parser)]
#[command(
    name = "portico",
    version,
    about = "Single-origin HTTP gateway for backend services",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        portico run                          Start on :3001 with local defaults\n  \
        portico routes                       Show the resolved route table\n  \
        portico health                       Check a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway
    Run(Box<RunArgs>),

    /// Validate and print the route table without starting
    Routes(RoutesArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

/// Backend service locations.
#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Backend Services")]
pub struct ServiceArgs {
    /// Auth service base URL (`/login`, `/users`, `/api`)
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_AUTH_URL)]
    pub auth_url: String,

    /// CRUD service base URL (`/admin-api`)
    #[arg(long, env = "CRUD_URL", default_value = DEFAULT_CRUD_URL)]
    pub crud_url: String,

    /// Calendar service base URL (`/calendar-api`)
    #[arg(long, env = "CALENDAR_URL", default_value = DEFAULT_CALENDAR_URL)]
    pub calendar_url: String,

    /// Meeting service base URL (`/booking-api`)
    #[arg(long, env = "MEETING_URL", default_value = DEFAULT_MEETING_URL)]
    pub meeting_url: String,

    /// Profile service base URL (`/profiles-api`)
    #[arg(long, env = "PROFILE_URL", default_value = DEFAULT_PROFILE_URL)]
    pub profile_url: String,

    /// Email service base URL (`/email-api`)
    #[arg(long, env = "EMAIL_URL", default_value = DEFAULT_EMAIL_URL)]
    pub email_url: String,

    /// How `/calendar-api` paths are forwarded
    #[arg(
        long,
        env = "CALENDAR_PATH_MODE",
        value_enum,
        default_value_t = CalendarPathMode::Identity
    )]
    pub calendar_path_mode: CalendarPathMode,
}

impl ServiceArgs {
    #[must_use]
    pub fn to_config(&self) -> GatewayConfig {
        GatewayConfig {
            services: ServiceUrls {
                auth: self.auth_url.clone(),
                crud: self.crud_url.clone(),
                calendar: self.calendar_url.clone(),
                meeting: self.meeting_url.clone(),
                profile: self.profile_url.clone(),
                email: self.email_url.clone(),
            },
            calendar_mode: self.calendar_path_mode,
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        portico run                                        Local defaults\n  \
        portico run -p 8080 --pretty                       Local dev mode\n  \
        CRUD_URL=http://crud:8081 portico run              Containerized backend")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[command(flatten)]
    pub services: ServiceArgs,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub services: ServiceArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: RoutesFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3001")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum RoutesFormat {
    Text,
    Json,
}
