pub mod config;
pub mod deidentify;
pub mod literature;
pub mod llm;
pub mod pipeline;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize tracing once for the whole process.
///
/// Respects `RUST_LOG` when set, otherwise falls back to the crate default.
/// Safe to call from multiple entry points (CLI, HTTP handler, tests).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
            )
            .init();

        tracing::info!("neuronote v{}", config::APP_VERSION);
    });
}
