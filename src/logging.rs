//! Diagnostics setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to whoever embeds it.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "bubble_layout=info";

/// Install a stderr subscriber honouring `RUST_LOG`.
///
/// `verbose` raises the default to debug. Calling this twice is harmless;
/// the second install is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "bubble_layout=debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
