//! Rayon thread pool configuration for batch workloads.
//!
//! The stepping loop inside one run is strictly single-threaded; the pool
//! exists for running many independent whole runs (seed sweeps, build
//! comparisons) across cores.

use rayon::ThreadPoolBuilder;

/// Configures how many worker threads a batch uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. 0 means the Rayon default (all cores).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run a closure on a pool with this worker count. With 0 workers the
    /// global Rayon pool is used; otherwise a temporary pool is built.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            // Pool construction only fails in degenerate environments; run
            // inline rather than abort the batch.
            Err(_) => f(),
        }
    }
}
