pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, run_seed_sweep, SweepResult};
pub use pool::WorkerPool;
