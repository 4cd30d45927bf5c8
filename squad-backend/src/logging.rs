// squad-backend/src/logging.rs

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the tracing subscriber for embedding binaries and tests.
///
/// Honors `RUST_LOG`; falls back to info-level output for this crate.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "squad_backend=info".into()))
        .with(fmt::layer())
        .init();
}
