//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`routes`], or [`health`]. Each handler
//! lives in its own submodule.

pub mod health;
pub mod routes;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::GatewayError;

pub async fn dispatch(cli: Cli) -> Result<(), GatewayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Routes(ref args)) => routes::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  portico v{version} \u{2014} single-origin HTTP gateway\n\n  \
         No command provided. To get started:\n\n    \
         portico run                   Start the gateway on :3001\n    \
         portico routes                Show where each path prefix is relayed\n    \
         portico --help                See all commands and options\n"
    );
}
