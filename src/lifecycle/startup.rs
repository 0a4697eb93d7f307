//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the store (optionally seeded), route table and dispatcher
//! - Start the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, so traffic only arrives once routes exist

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ApiConfig, ConfigError};
use crate::dispatch::Dispatcher;
use crate::handlers::Services;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability;
use crate::payments::SimulatedGateway;
use crate::routes;
use crate::routing::RouterError;
use crate::store::{MemoryStore, StoreError};

/// Anything that stops the process from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("seed: {0}")]
    Store(#[from] StoreError),

    #[error("routes: {0}")]
    Routes(#[from] RouterError),

    #[error("invalid address: {0}")]
    Address(#[from] AddrParseError),

    #[error("metrics: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store, collaborators, route table and dispatcher for `config`.
pub fn build_dispatcher(config: &ApiConfig) -> Result<Dispatcher, StartupError> {
    let store = match &config.seed_path {
        Some(path) => MemoryStore::load_seed(path)?,
        None => MemoryStore::new(),
    };
    let services = Services::new(Arc::new(store), Arc::new(SimulatedGateway));
    let router = routes::draw()?;
    Ok(Dispatcher::new(Arc::new(router), services, config.auth.clone()))
}

/// The HTTP application for `config`, ready to serve.
pub fn build_app(config: &ApiConfig) -> Result<HttpServer, StartupError> {
    Ok(HttpServer::new(build_dispatcher(config)?, config))
}

/// Run until `shutdown` fires or a termination signal arrives.
pub async fn serve(config: ApiConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        observability::init_metrics(addr)?;
    }

    let server = build_app(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        "Listening for connections"
    );

    signals::forward_signals(&shutdown);
    server.run(listener, shutdown).await?;
    Ok(())
}
