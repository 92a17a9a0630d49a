//! Batch execution of independent runs: seed sweeps over one build.

use rayon::prelude::*;

use crate::combat::{Simulation, SimulationSummary};
use crate::data::build::{BuildConfig, BuildError};
use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`,
/// as equal in size as possible.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + usize::from(i < remainder);
        ranges.push((start, start + size));
        start += size;
    }
    ranges
}

/// One sweep entry: the seed a run used and its final aggregates.
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub seed: u64,
    pub summary: SimulationSummary,
}

/// Run the same build under `runs` consecutive seeds, one full simulation
/// per seed, distributed across the pool. Results keep seed order.
pub fn run_seed_sweep(
    build: &BuildConfig,
    base_seed: u64,
    runs: u32,
    pool: &WorkerPool,
) -> Result<Vec<SweepResult>, BuildError> {
    // Surface configuration errors once, up front, instead of per worker.
    Simulation::new(build, Some(base_seed))?;

    pool.install(|| {
        (0..runs as u64)
            .into_par_iter()
            .map(|offset| {
                let seed = base_seed.wrapping_add(offset);
                let summary = Simulation::new(build, Some(seed))?.run();
                Ok(SweepResult { seed, summary })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build::sample_build;

    #[test]
    fn batch_ranges_even_split() {
        assert_eq!(batch_ranges(100, 4), vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
    }

    #[test]
    fn batch_ranges_with_remainder() {
        assert_eq!(batch_ranges(10, 3), vec![(0, 4), (4, 7), (7, 10)]);
    }

    #[test]
    fn batch_ranges_empty() {
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }

    #[test]
    fn sweep_runs_every_seed_and_keeps_order() {
        let mut build = sample_build();
        build.simulators = 2;
        build.simulation_time_ms = 5_000;
        let results = run_seed_sweep(&build, 100, 3, &WorkerPool::default()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.seed).collect::<Vec<_>>(),
            vec![100, 101, 102]
        );
    }

    #[test]
    fn sweep_rejects_invalid_build() {
        let mut build = sample_build();
        build.simulators = 0;
        assert!(run_seed_sweep(&build, 1, 2, &WorkerPool::default()).is_err());
    }
}
