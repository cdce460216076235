/// Default rows-per-leaf / block-area threshold for the parallel strategies.
pub const DEFAULT_THRESHOLD: usize = 64;

/// Configuration for the fork-join worker pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads. 0 selects the available hardware concurrency.
    pub num_threads: usize,
    /// Workers are named `{thread_name_prefix}-{index}`.
    pub thread_name_prefix: String,
    /// Per-worker stack size in bytes. `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl PoolConfig {
    /// Config for a pool with exactly `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Self {
        PoolConfig {
            num_threads,
            ..Self::default()
        }
    }

    /// Worker count after resolving 0 to the hardware concurrency.
    pub fn resolved_threads(&self) -> usize {
        if self.num_threads > 0 {
            return self.num_threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            num_threads: 0,
            thread_name_prefix: "fm-worker".to_string(),
            stack_size: None,
        }
    }
}
