use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LINGUIST_LOG";

/// Installs the global subscriber. Output goes to stderr: stdout belongs to the protocol.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
