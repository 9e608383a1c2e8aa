use tracing_subscriber::{EnvFilter, fmt};

/// Installs an `info`-level subscriber unless `RUST_LOG` says otherwise.
///
/// Log lines go to stderr; stdout is reserved for the messages each client
/// prints for its user.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
