#![allow(dead_code)]

use std::sync::Arc;

use counselor_client::{ApiClient, ClientConfig, CounselorClient, SessionStore};
use wiremock::MockServer;

/// Quiet by default; `RUST_LOG=debug` for the full trace.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_base_url: server.uri(),
        request_timeout_secs: 5,
        log_level: "debug".to_string(),
    }
}

/// An API client over the mock server with an anonymous in-memory session.
pub fn anonymous_client(server: &MockServer) -> Arc<ApiClient> {
    let session = SessionStore::in_memory();
    Arc::new(ApiClient::new(&test_config(server), session).expect("client construction"))
}

/// An API client already holding the given token pair.
pub fn authenticated_client(server: &MockServer, access: &str, refresh: &str) -> Arc<ApiClient> {
    let session = SessionStore::in_memory();
    session.store_tokens(access, refresh).expect("seed tokens");
    Arc::new(ApiClient::new(&test_config(server), session).expect("client construction"))
}

/// The fully wired client over the mock server.
pub fn wired_client(server: &MockServer, access: &str, refresh: &str) -> CounselorClient {
    let session = SessionStore::in_memory();
    session.store_tokens(access, refresh).expect("seed tokens");
    CounselorClient::new(&test_config(server), session).expect("client construction")
}
