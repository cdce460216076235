use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::config::PoolConfig;
use crate::error::{MultiplyError, Result};

/// Work-stealing worker pool shared by the parallel multipliers.
///
/// Built once and handed to multipliers behind an `Arc`. Any number of
/// multiply calls may run on one pool at the same time; the pool itself
/// holds no per-call state.
#[derive(Debug)]
pub struct ForkJoinPool {
    pool: rayon::ThreadPool,
}

impl ForkJoinPool {
    /// Build a pool from `config`.
    ///
    /// # Errors
    /// Returns `PoolBuild` if the worker threads cannot be started.
    pub fn new(config: &PoolConfig) -> Result<Self> {
        let threads = config.resolved_threads();
        let prefix = config.thread_name_prefix.clone();

        let mut builder = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{}-{}", prefix, i));
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let pool = builder
            .build()
            .map_err(|e| MultiplyError::PoolBuild(e.to_string()))?;
        debug!(threads, "fork-join pool started");
        Ok(ForkJoinPool { pool })
    }

    /// Build a pool sized to the available hardware concurrency.
    pub fn with_default_config() -> Result<Self> {
        Self::new(&PoolConfig::default())
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `root` on the pool and block until it returns.
    ///
    /// A panic raised by `root` or any unit it forks is caught here and
    /// reported as `TaskPanicked`. The pool stays usable afterwards.
    pub fn invoke<T, F>(&self, root: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send,
        T: Send,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| self.pool.install(root))) {
            Ok(result) => result,
            Err(payload) => Err(MultiplyError::TaskPanicked(panic_message(payload.as_ref()))),
        }
    }

    /// Fork `spawned`, compute `inline` on the calling worker, then join.
    ///
    /// `spawned` is queued on the current worker's deque, where any idle
    /// worker may steal it. If nobody has stolen it by the time `inline`
    /// finishes, the calling worker runs it itself. Returns only after both
    /// have completed, as `(spawned_result, inline_result)`.
    pub fn fork_join<S, I, RS, RI>(&self, spawned: S, inline: I) -> (RS, RI)
    where
        S: FnOnce() -> RS + Send,
        I: FnOnce() -> RI + Send,
        RS: Send,
        RI: Send,
    {
        // install() runs the closure directly when already on one of our workers.
        let (ri, rs) = self.pool.install(|| rayon::join(inline, spawned));
        (rs, ri)
    }

    /// Quadrant form of [`fork_join`](Self::fork_join): `tl`, `tr` and `bl`
    /// are made available for stealing while `br` runs on the calling worker.
    /// Returns once all four have completed.
    pub fn fork_join4<A, B, C, D, RA, RB, RC, RD>(
        &self,
        tl: A,
        tr: B,
        bl: C,
        br: D,
    ) -> (RA, RB, RC, RD)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        C: FnOnce() -> RC + Send,
        D: FnOnce() -> RD + Send,
        RA: Send,
        RB: Send,
        RC: Send,
        RD: Send,
    {
        let ((ra, rb), (rc, rd)) =
            self.fork_join(|| self.fork_join(tl, tr), || self.fork_join(bl, br));
        (ra, rb, rc, rd)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
