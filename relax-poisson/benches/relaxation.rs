use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use relax_grid::Shape;
use relax_poisson::{Decomposition, PoissonProblemBuilder, SolverSettings, UpdateStrategy};
use utilities::random_field;

const ITERATIONS: usize = 10;

pub fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential");

    for side in [16, 32, 64, 96].into_iter() {
        let source = random_field(Shape::cube(side).unwrap());
        let problem = PoissonProblemBuilder::new()
            .with_source(&source)
            .build()
            .unwrap();
        let mut output = vec![0.; source.as_slice().len()];
        for strategy in [UpdateStrategy::Swap, UpdateStrategy::Copy] {
            let settings = SolverSettings::fixed(ITERATIONS).with_strategy(strategy);
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), side),
                &side,
                |b, _| b.iter(|| problem.solve_into(black_box(&settings), black_box(&mut output))),
            );
        }
    }
    group.finish();
}

pub fn bench_parallel(c: &mut Criterion) {
    let source = random_field(Shape::cube(96).unwrap());
    let problem = PoissonProblemBuilder::new()
        .with_source(&source)
        .build()
        .unwrap();
    let mut output = vec![0.; source.as_slice().len()];

    for decomposition in [Decomposition::ForkJoin, Decomposition::Halo] {
        let mut group = c.benchmark_group(format!("{decomposition:?}"));
        for workers in [2, 4, 8].into_iter() {
            let settings = SolverSettings::fixed(ITERATIONS)
                .with_workers(workers)
                .with_decomposition(decomposition);
            group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
                b.iter(|| problem.solve_into(black_box(&settings), black_box(&mut output)))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_sequential, bench_parallel);
criterion_main!(benches);
