//! Engine throughput benchmarks: full runs per second at varying trial
//! counts.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rotasim::combat::Simulation;
use rotasim::data::build::sample_build;

fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator");
    group.sample_size(30);

    for &trials in &[1u32, 10, 100] {
        let mut build = sample_build();
        build.simulators = trials;
        build.simulation_time_ms = 60_000;

        group.throughput(Throughput::Elements(trials as u64));
        group.bench_with_input(format!("run_{trials}_trials"), &build, |b, build| {
            b.iter_batched(
                || Simulation::new(build, Some(7)).expect("valid build"),
                |mut simulation| black_box(simulation.run()),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulator);
criterion_main!(benches);
