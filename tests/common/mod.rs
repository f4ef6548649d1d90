#![allow(dead_code)]

#[path = "../../src/mock.rs"]
mod mock;

use assert_cmd::Command;
use axum::http::StatusCode;
use tokio::runtime::Runtime;

use mock::MockServer;

/// A mock geocoding endpoint served from a background runtime, so the binary
/// under test can reach it while the test blocks on the process.
pub struct MockGeocoder {
    pub endpoint: String,
    server: MockServer,
    _runtime: Runtime,
}

impl MockGeocoder {
    /// Serve the canned responses by `q`. Unknown places get `200 []`.
    pub fn start(responses: &[(&str, StatusCode, &str)]) -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime
            .block_on(MockServer::start(responses.iter().copied()))
            .unwrap();
        Self {
            endpoint: server.endpoint.to_string(),
            server,
            _runtime: runtime,
        }
    }

    /// The `q` parameter of every request received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.server.queries()
    }
}

/// The binary with a dummy key and the given endpoint.
pub fn landmark_coords(endpoint: &str) -> Command {
    let mut cmd = Command::cargo_bin("landmark-coords").unwrap();
    cmd.env("LOCATIONIQ_API_KEY", "test-key")
        .env("LOCATIONIQ_ENDPOINT", endpoint)
        .env("RUST_LOG", "warn");
    cmd
}
