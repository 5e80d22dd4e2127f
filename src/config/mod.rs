//! Gateway configuration.
//!
//! [`model`] holds the immutable [`GatewayConfig`](model::GatewayConfig)
//! and the route registrations it expands into; [`validation`] checks
//! those registrations before the route table is built. Nothing in the
//! crate reads environment variables outside of `clap` parsing.

pub mod model;
pub mod validation;
