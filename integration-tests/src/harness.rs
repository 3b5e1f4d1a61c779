use serde_json::Value;
use std::path::PathBuf;
use std::sync::Once;
use trigger_http_core::event::HttpRequestEvent;

static TRACING: Once = Once::new();

/// Installs a test subscriber once per test binary; `RUST_LOG` controls output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(file)
}

pub fn load_fixture(file: &str) -> Value {
    let raw = std::fs::read(fixture_path(file)).expect("failed to read fixture");
    serde_json::from_slice(&raw).expect("fixture is not valid JSON")
}

pub fn load_request(file: &str) -> HttpRequestEvent {
    init_tracing();
    let event = load_fixture(file);
    tracing::debug!(fixture = file, "loading fixture");
    HttpRequestEvent::new(event).expect("fixture is not an http event")
}
