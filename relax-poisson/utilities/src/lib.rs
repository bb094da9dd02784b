use nalgebra::RealField;
use rand::{rngs::StdRng, Rng, SeedableRng};
use relax_grid::{Field, Shape};

/// A field of values drawn uniformly from `[-1, 1)`
///
/// The generator is seeded from the shape, so repeated calls for one shape agree.
pub fn random_field(shape: Shape) -> Field<f64> {
    let [x, y, z] = shape.extents();
    let mut rng = StdRng::seed_from_u64(((z * 1_000 + y) * 1_000 + x) as u64);
    let values = (0..shape.len())
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect::<Vec<_>>();
    Field::from_vec(shape, values).expect("Field data is invalid")
}

/// A field which is zero apart from a single voxel
pub fn point_source<T: Copy + RealField>(
    shape: Shape,
    (x, y, z): (usize, usize, usize),
    value: T,
) -> Field<T> {
    let mut field = Field::zeros(shape);
    field.set(x, y, z, value);
    field
}
