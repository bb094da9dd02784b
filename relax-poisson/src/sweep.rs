//! A single Jacobi sweep over a run of `z` planes
//!
//! The box is visited region by region (interior, faces, edges, corners) so the choice of
//! which neighbours come from the buffer and which take the boundary value is made once per
//! region rather than once per voxel.

use crate::Stencil;
use itertools::izip;
use nalgebra::RealField;
use relax_grid::{Axis, Region, Shape, Side};
use std::ops::Range;

/// A contiguous run of whole `z` planes taken from a buffer covering the full box
#[derive(Copy, Clone, Debug)]
pub struct PlaneWindow<'a, T> {
    values: &'a [T],
    first_plane: usize,
}

impl<'a, T> PlaneWindow<'a, T> {
    /// `values` starts at plane `first_plane` of the box
    pub fn new(values: &'a [T], first_plane: usize) -> Self {
        Self {
            values,
            first_plane,
        }
    }

    /// A window over every plane of the box
    pub fn whole(values: &'a [T]) -> Self {
        Self::new(values, 0)
    }
}

/// Write the next iterate for every voxel with `z` in `planes`
///
/// `current` must contain the planes in `planes` together with the planes immediately below
/// and above them, where those exist in the box. `source` covers the full box and `next`
/// covers exactly `planes`.
pub fn sweep_planes<T: Copy + RealField>(
    shape: &Shape,
    planes: Range<usize>,
    current: PlaneWindow<'_, T>,
    source: &[T],
    next: &mut [T],
    stencil: &Stencil<T>,
) {
    debug_assert_eq!(next.len(), planes.len() * shape.plane_len());
    for region in Region::all() {
        let ranges = region.ranges_within(shape, &planes);
        if ranges.iter().any(|range| range.is_empty()) {
            continue;
        }
        sweep_region(
            shape,
            region,
            ranges,
            &current,
            source,
            next,
            planes.start,
            stencil,
        );
    }
}

/// The pair of neighbours `(+1, -1)` of the voxel at window offset `offset` along one axis
#[inline(always)]
fn neighbours_along<T: Copy>(
    side: Side,
    values: &[T],
    offset: usize,
    stride: usize,
    boundary: T,
) -> (T, T) {
    match side {
        Side::Min => (values[offset + stride], boundary),
        Side::Interior => (values[offset + stride], values[offset - stride]),
        Side::Max => (boundary, values[offset - stride]),
    }
}

#[allow(clippy::too_many_arguments)]
fn sweep_region<T: Copy + RealField>(
    shape: &Shape,
    region: Region,
    [xs, ys, zs]: [Range<usize>; 3],
    current: &PlaneWindow<'_, T>,
    source: &[T],
    next: &mut [T],
    first_next_plane: usize,
    stencil: &Stencil<T>,
) {
    let boundary = stencil.boundary();
    let [sx, sy, sz] = Axis::ALL.map(|axis| shape.stride(axis));
    let window_start = current.first_plane * shape.plane_len();
    let next_start = first_next_plane * shape.plane_len();

    for z in zs {
        for y in ys.clone() {
            for x in xs.clone() {
                let global = shape.index(x, y, z);
                let local = global - window_start;
                let (x_plus, x_minus) =
                    neighbours_along(region.x, current.values, local, sx, boundary);
                let (y_plus, y_minus) =
                    neighbours_along(region.y, current.values, local, sy, boundary);
                let (z_plus, z_minus) =
                    neighbours_along(region.z, current.values, local, sz, boundary);
                next[global - next_start] = stencil.update(
                    [x_plus, x_minus, y_plus, y_minus, z_plus, z_minus],
                    source[global],
                );
            }
        }
    }
}

/// Largest absolute change between two iterates of the same planes
pub fn max_change<T: Copy + RealField>(previous: &[T], next: &[T]) -> T {
    izip!(previous, next).fold(T::zero(), |acc, (&before, &after)| {
        acc.max((after - before).abs())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use relax_grid::{partition_planes, Field};
    use utilities::{point_source, random_field};

    fn full_sweep(shape: &Shape, current: &[f64], source: &[f64], stencil: &Stencil<f64>) -> Vec<f64> {
        let mut next = vec![f64::NAN; shape.len()];
        sweep_planes(
            shape,
            0..shape.extent(Axis::Z),
            PlaneWindow::whole(current),
            source,
            &mut next,
            stencil,
        );
        next
    }

    #[test]
    fn every_voxel_is_written_by_a_sweep() {
        let shape = Shape::new(4, 5, 6).unwrap();
        let current = random_field(shape);
        let source = random_field(shape);
        let next = full_sweep(&shape, current.as_slice(), source.as_slice(), &Stencil::new(0.3, 0.7));
        assert!(next.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn point_source_only_reaches_its_face_neighbours_after_one_sweep() {
        let shape = Shape::cube(5).unwrap();
        let source = point_source(shape, (2, 2, 2), 6.0);
        let next = full_sweep(&shape, source.as_slice(), source.as_slice(), &Stencil::new(0., 1.));
        let next = Field::from_vec(shape, next).unwrap();

        assert_eq!(next.get(2, 2, 2), -1.0);
        for (x, y, z) in [(1, 2, 2), (3, 2, 2), (2, 1, 2), (2, 3, 2), (2, 2, 1), (2, 2, 3)] {
            assert_eq!(next.get(x, y, z), 1.0);
        }
        for index in 0..shape.len() {
            let (x, y, z) = shape.coordinates(index);
            let distance = x.abs_diff(2) + y.abs_diff(2) + z.abs_diff(2);
            if distance >= 2 {
                assert_eq!(next.get(x, y, z), 0.0);
            }
        }
    }

    #[test]
    fn boundary_substitution_matches_an_explicitly_padded_box() {
        let shape = Shape::new(4, 5, 3).unwrap();
        let boundary = 1.75;
        let current = random_field(shape);
        let source = random_field(shape);
        let stencil = Stencil::new(boundary, 0.4);
        let next = full_sweep(&shape, current.as_slice(), source.as_slice(), &stencil);

        // Embed the box in one extra layer of boundary-valued voxels, then update only the
        // unpadded voxels, all of which are interior to the padded box.
        let [nx, ny, nz] = shape.extents();
        let padded_shape = Shape::new(nx + 2, ny + 2, nz + 2).unwrap();
        let padded = Field::from_fn(padded_shape, |x, y, z| {
            let inside = (1..=nx).contains(&x) && (1..=ny).contains(&y) && (1..=nz).contains(&z);
            if inside {
                current.get(x - 1, y - 1, z - 1)
            } else {
                boundary
            }
        });
        for index in 0..shape.len() {
            let (x, y, z) = shape.coordinates(index);
            let (px, py, pz) = (x + 1, y + 1, z + 1);
            let expected = stencil.update(
                [
                    padded.get(px + 1, py, pz),
                    padded.get(px - 1, py, pz),
                    padded.get(px, py + 1, pz),
                    padded.get(px, py - 1, pz),
                    padded.get(px, py, pz + 1),
                    padded.get(px, py, pz - 1),
                ],
                source.get(x, y, z),
            );
            assert_eq!(next[index], expected, "voxel ({x}, {y}, {z})");
        }
    }

    #[test]
    fn sweeping_slabs_separately_matches_a_whole_sweep() {
        let shape = Shape::new(5, 4, 7).unwrap();
        let current = random_field(shape);
        let source = random_field(shape);
        let stencil = Stencil::new(-0.5, 1.3);
        let whole = full_sweep(&shape, current.as_slice(), source.as_slice(), &stencil);

        let plane = shape.plane_len();
        for slab in partition_planes(7, 3) {
            let mut next = vec![f64::NAN; slab.len() * plane];
            let window_start = slab.start.saturating_sub(1);
            let window_end = (slab.end + 1).min(7);
            let window = &current.as_slice()[window_start * plane..window_end * plane];
            sweep_planes(
                &shape,
                slab.clone(),
                PlaneWindow::new(window, window_start),
                source.as_slice(),
                &mut next,
                &stencil,
            );
            assert_eq!(next.as_slice(), &whole[slab.start * plane..slab.end * plane]);
        }
    }

    #[test]
    fn max_change_is_the_largest_absolute_difference() {
        assert_eq!(max_change(&[0., 1., 2.], &[0.5, -1., 2.]), 2.);
        assert_eq!(max_change::<f64>(&[], &[]), 0.);
    }
}
