//! Parallelism configuration for record classification.
//!
//! Classification is stateless per record, so records are split across
//! rayon's thread pool and each task folds its share into a local partial
//! aggregate. These settings control the pool size and how finely the
//! input is split.

use serde::{Deserialize, Serialize};

/// Default value for parallel processing enabled
fn default_enabled() -> bool {
    true
}

/// Default minimum number of records folded by one rayon task
fn default_chunk_size() -> usize {
    1024
}

/// Configuration for parallel aggregation.
///
/// # Example
///
/// ```rust
/// use crash_aggregates::config::ParallelConfig;
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
///     chunk_size: Some(512),
/// };
/// assert_eq!(config.effective_chunk_size(), 512);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    /// Enable parallel processing (default: true)
    ///
    /// When disabled, records are folded sequentially on the calling thread.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Worker threads for the global pool (default: available cores)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Minimum records per rayon task (default: 1024)
    ///
    /// Each task keeps its own partial aggregate, so very small tasks only
    /// add merge overhead. Also accepted as `batch_size`.
    #[serde(default = "default_chunk_size_option", alias = "batch_size")]
    pub chunk_size: Option<usize>,
}

fn default_chunk_size_option() -> Option<usize> {
    Some(default_chunk_size())
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_concurrency: None,
            chunk_size: Some(default_chunk_size()),
        }
    }
}

impl ParallelConfig {
    /// Create a config with parallel processing disabled.
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Get the effective concurrency level.
    ///
    /// Returns the configured max_concurrency, or the number of
    /// available CPU cores if not specified or zero.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency
            .filter(|threads| *threads > 0)
            .unwrap_or_else(num_cpus)
    }

    /// Apply command-line overrides: a non-zero `jobs` replaces
    /// `max_concurrency`, `no_parallel` disables parallel folding.
    pub fn with_overrides(mut self, jobs: usize, no_parallel: bool) -> Self {
        if jobs > 0 {
            self.max_concurrency = Some(jobs);
        }
        if no_parallel {
            self.enabled = false;
        }
        self
    }

    /// Get the effective chunk size. Never below 1.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(default_chunk_size()).max(1)
    }
}

/// Returns the number of available CPU cores.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}
