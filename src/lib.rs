//! Match-three resolution engine (workspace facade crate).
//!
//! Re-exports the member crates under one name so binaries, integration
//! tests, and benches can use `match_three::{core, adapter, types}`.

pub use match_three_adapter as adapter;
pub use match_three_core as core;
pub use match_three_types as types;

/// Install the `tracing` subscriber used by the binaries.
///
/// The filter comes from `MATCH3_LOG`, then `RUST_LOG`, then `info`.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = std::env::var("MATCH3_LOG")
        .ok()
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
