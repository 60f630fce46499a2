//! Helpers for tests that need a local mock server.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var("DOCCHAT_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Reports whether localhost sockets are unavailable, logging the skip.
#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[socket-bound-test] cannot bind localhost socket at {}:{}; mock-server test skipped",
        location.file(),
        location.line()
    );
    if socket_tests_required() {
        panic!("{message}. Unset DOCCHAT_REQUIRE_SOCKET_TESTS to allow skipping.");
    }
    eprintln!("{message}. Set DOCCHAT_REQUIRE_SOCKET_TESTS=1 to fail instead.");
    true
}

pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if should_skip_socket_bound_test() {
        None
    } else {
        Some(MockServer::start().await)
    }
}

/// Writes `contents` as `docchat/config.toml` under `config_home`.
pub fn write_docchat_config(config_home: &std::path::Path, contents: &str) {
    let config_dir = config_home.join("docchat");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}
