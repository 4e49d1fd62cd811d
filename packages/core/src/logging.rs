//! Logging setup for the binary.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// `verbose` raises the default level for this crate from `warn` to `debug`.
/// Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default = if verbose { "passsssword=debug" } else { "passsssword=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
