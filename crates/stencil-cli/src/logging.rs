//! tracing-subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Logs go to stderr so they never interleave with prompts on stdout.
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
