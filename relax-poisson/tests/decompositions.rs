use approx::assert_relative_eq;
use proptest::prelude::*;
use relax_grid::{Field, Shape};
use relax_poisson::{
    poisson_dirichlet, Decomposition, PoissonProblemBuilder, SolverSettings, UpdateStrategy,
};
use utilities::{point_source, random_field};

fn solve(
    source: &Field<f64>,
    boundary_value: f64,
    settings: &SolverSettings<f64>,
) -> Field<f64> {
    PoissonProblemBuilder::new()
        .with_source(source)
        .with_boundary_value(boundary_value)
        .with_spacing(0.1)
        .build()
        .unwrap()
        .solve(settings)
        .unwrap()
        .potential
}

#[test]
fn four_workers_match_one_when_the_planes_divide_evenly() {
    let source = random_field(Shape::new(7, 6, 8).unwrap());
    let expected = solve(&source, 1.0, &SolverSettings::fixed(12));
    for decomposition in [Decomposition::ForkJoin, Decomposition::Halo] {
        let settings = SolverSettings::fixed(12)
            .with_workers(4)
            .with_decomposition(decomposition);
        assert_eq!(solve(&source, 1.0, &settings), expected);
    }
}

#[test]
fn four_workers_match_one_when_the_last_slab_takes_the_remainder() {
    let source = random_field(Shape::new(5, 7, 11).unwrap());
    let expected = solve(&source, -0.5, &SolverSettings::fixed(13));
    for decomposition in [Decomposition::ForkJoin, Decomposition::Halo] {
        let settings = SolverSettings::fixed(13)
            .with_workers(4)
            .with_decomposition(decomposition);
        assert_eq!(solve(&source, -0.5, &settings), expected);
    }
}

#[test]
fn the_flat_entry_point_matches_the_builder() {
    let shape = Shape::new(9, 4, 6).unwrap();
    let source = point_source(shape, (4, 2, 3), 1.0);
    let expected = PoissonProblemBuilder::new()
        .with_source(&source)
        .with_boundary_value(0.25)
        .with_spacing(0.5)
        .build()
        .unwrap()
        .solve(&SolverSettings::fixed(20))
        .unwrap()
        .potential;
    let potential = poisson_dirichlet(source.as_slice(), 0.25, [9, 4, 6], 0.5, 20, 3).unwrap();
    assert_eq!(potential.as_slice(), expected.as_slice());
}

#[test]
fn the_potential_of_a_point_source_is_symmetric() {
    let shape = Shape::cube(9).unwrap();
    let source = point_source(shape, (4, 4, 4), 1.0);
    let potential = solve(&source, 0.0, &SolverSettings::fixed(40).with_workers(3));
    for (a, b) in [((3, 4, 4), (5, 4, 4)), ((4, 3, 4), (4, 5, 4)), ((1, 2, 3), (7, 6, 5))] {
        assert_relative_eq!(
            potential.get(a.0, a.1, a.2),
            potential.get(b.0, b.1, b.2),
            max_relative = 1e-12
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_parallel_configuration_matches_the_sequential_result(
        x in 3usize..7,
        y in 3usize..7,
        z in 3usize..12,
        iterations in 0usize..9,
        workers in 2usize..6,
        halo in any::<bool>(),
        copy in any::<bool>(),
    ) {
        let source = random_field(Shape::new(x, y, z).unwrap());
        let expected = solve(&source, 0.3, &SolverSettings::fixed(iterations));
        let decomposition = if halo { Decomposition::Halo } else { Decomposition::ForkJoin };
        let strategy = if copy { UpdateStrategy::Copy } else { UpdateStrategy::Swap };
        let settings = SolverSettings::fixed(iterations)
            .with_workers(workers)
            .with_decomposition(decomposition)
            .with_strategy(strategy);
        prop_assert_eq!(solve(&source, 0.3, &settings), expected);
    }
}
