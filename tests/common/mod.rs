//! Shared fixtures for the integration suite.
//!
//! Provides a raw TCP client for poking the control socket and handlers
//! that report their invocations back to the test.

pub mod client;
pub mod handlers;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use handlers::{RecordingHandler, expect_call, expect_no_call};

/// Install a test tracing subscriber; safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}
