//! Portico is a single-origin HTTP gateway.
//!
//! It sits in front of a set of independent backend services and relays
//! browser requests to them by path prefix. Each request is matched
//! against a fixed route table, its path rewritten, its `Authorization`
//! and `Content-Type` headers and body forwarded, and the backend's
//! response relayed back with its status code untouched.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line and environment parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, routes, health).
//! - [`config`] -- The immutable gateway configuration and route validation.
//! - [`error`] -- Process-level and per-request error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The relay core: route table, request translation, upstream
//!   forwarding, response translation and the failure wrapper.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.

// Public functions are consumed by the binary and tests only.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
