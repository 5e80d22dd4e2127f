//! `portico run`: start the gateway.
//!
//! Builds the immutable configuration from flags and environment, validates
//! the route table (duplicate prefixes and bad base URLs abort startup),
//! then serves until SIGTERM / Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::error::GatewayError;
use crate::logging;
use crate::proxy::routing::RouteTable;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = args.services.to_config();
    let routes = RouteTable::from_config(&config)?;
    let route_count = routes.len();

    for route in routes.routes() {
        tracing::debug!(
            prefix = %route.prefix,
            service = route.service,
            upstream = %route.base_url,
            rewrite = ?route.rewrite,
            "route registered"
        );
    }

    let state = Arc::new(AppState::new(routes));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        routes = route_count,
        calendar_path_mode = ?config.calendar_mode,
        "portico started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("portico stopped");
    Ok(())
}
