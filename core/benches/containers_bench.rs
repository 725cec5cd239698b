use criterion::{Criterion, criterion_group, criterion_main};
use seqbench_core::config::DEFAULT_FIXTURE_SIZE;
use seqbench_core::fixture::FixtureSet;
use seqbench_core::perf::scenarios::catalog;
use std::hint::black_box;

fn bench_container_scenarios(c: &mut Criterion) {
    let registry = catalog(DEFAULT_FIXTURE_SIZE).expect("build scenario catalog for benchmarking");
    let fixtures = FixtureSet::build(&registry.fixture_requirements(), DEFAULT_FIXTURE_SIZE, true);

    for kind in seqbench_core::ContainerKind::ALL {
        let mut group = c.benchmark_group(kind.label());
        for workload in registry.iter().filter(|w| w.kind() == kind) {
            let fixture = match fixtures.get(workload.kind(), workload.order()) {
                Some(Ok(fixture)) => fixture,
                _ => panic!("fixture for {} failed to build", workload.label()),
            };
            group.bench_function(workload.operation(), |b| {
                b.iter(|| {
                    let value = workload
                        .evaluate(black_box(fixture))
                        .expect("scenario failed while benchmarking");
                    black_box(value);
                });
            });
        }
        group.finish();
    }
}

criterion_group!(containers, bench_container_scenarios);
criterion_main!(containers);
