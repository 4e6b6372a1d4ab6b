//! Helpers for pointing the harness at a test store.

use msgbench::{Config, MessageClient, ScenarioRunner};
use std::net::SocketAddr;

pub fn config_for(addr: SocketAddr) -> Config {
    Config::new().with_base_url(format!("http://{addr}"))
}

pub fn client_for(addr: SocketAddr) -> MessageClient {
    MessageClient::new(&config_for(addr)).unwrap()
}

pub fn runner_for(addr: SocketAddr, workers: usize) -> ScenarioRunner {
    ScenarioRunner::new(client_for(addr), workers)
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
