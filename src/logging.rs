//! Structured logging on `tracing-subscriber`.
//!
//! JSON lines when stdout is not a terminal, the pretty formatter when it
//! is. `--json` and `--pretty` override the detection.

use std::io::IsTerminal;

use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    pick_format(pretty, json, std::io::stdout().is_terminal())
}

const fn pick_format(pretty: bool, json: bool, tty: bool) -> LogFormat {
    match (json, pretty || tty) {
        (false, true) => LogFormat::Pretty,
        _ => LogFormat::Json,
    }
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let output = match format {
        LogFormat::Json => fmt::layer().json().with_target(false).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };
    let filter = Targets::new().with_default(level.to_tracing_level());

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .init();
}
