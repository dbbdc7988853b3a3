#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use lector_server::handler::routes;
use lector_server::middleware::{MiddlewareConfig, RouterMiddlewareExt};
use lector_server::service::ServiceState;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "lector_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "lector_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "lector_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing().context("failed to initialize tracing")?;
    cli.log();
    cli.validate()?;

    let engine = cli
        .engine
        .create_recognizer()
        .context("failed to create recognition engine")?;

    let state = ServiceState::from_config(&cli.service, engine)
        .context("failed to create service state")?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes().with_middleware(middleware).with_state(state)
}
