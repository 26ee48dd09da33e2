//! Runtime setup: thread pool and logging.

use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Rayon thread stack size
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Configure rayon global thread pool once at startup.
/// Zero threads leaves the pool size to rayon.
pub fn configure_thread_pool(threads: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);

    if threads > 0 {
        builder = builder.num_threads(threads);
    }

    match builder.build_global() {
        Ok(()) => debug!(threads = rayon::current_num_threads(), "configured thread pool"),
        // Already configured
        Err(e) => debug!(error = %e, "thread pool already configured"),
    }
}

/// Default filter directive for a `-v` count. `RUST_LOG` wins when set.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber, writing to stderr.
/// `log` records from dependencies are bridged through the same subscriber.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(verbosity_directive(0), "warn");
        assert_eq!(verbosity_directive(1), "info");
        assert_eq!(verbosity_directive(2), "debug");
        assert_eq!(verbosity_directive(7), "trace");
    }
}
