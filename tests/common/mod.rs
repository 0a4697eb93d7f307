//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;

use higgler_api::config::ApiConfig;
use higgler_api::lifecycle::{build_app, build_dispatcher, Shutdown};
use higgler_api::Dispatcher;

pub const ANN_TOKEN: &str = "token-ann";
pub const BOB_TOKEN: &str = "token-bob";
pub const TOKEN_HEADER: &str = "Authentication-Token";

/// Ann is the first user created after the fixture's fixed ids.
pub const ANN_ID: u64 = 41;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/seed.json")
}

/// Config pointing at the seed fixture, bound to an ephemeral port.
pub fn seeded_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.seed_path = Some(fixture_path());
    config
}

/// Dispatcher over the full route table and a freshly seeded store.
pub fn seeded_dispatcher() -> Dispatcher {
    build_dispatcher(&seeded_config()).unwrap()
}

/// A live server on an ephemeral port. Trigger the returned `Shutdown` to stop it.
pub async fn start_server(config: ApiConfig) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let server = build_app(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            server.run(listener, shutdown).await.unwrap();
        })
    };
    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(20)).await;
    (addr, shutdown, handle)
}
