use crate::{Axis, Shape};
use std::ops::Range;

/// Where a region sits along a single axis
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first plane, `0`
    Min,
    /// Every plane strictly between the two faces, `1..extent - 1`
    Interior,
    /// The last plane, `extent - 1`
    Max,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Min, Side::Interior, Side::Max];

    /// The coordinates covered along an axis of length `extent`
    pub fn range(&self, extent: usize) -> Range<usize> {
        match self {
            Side::Min => 0..1,
            Side::Interior => 1..extent - 1,
            Side::Max => extent - 1..extent,
        }
    }

    /// The side a coordinate falls on along an axis of length `extent`
    pub fn of(coordinate: usize, extent: usize) -> Self {
        if coordinate == 0 {
            Side::Min
        } else if coordinate == extent - 1 {
            Side::Max
        } else {
            Side::Interior
        }
    }

    pub fn is_boundary(&self) -> bool {
        !matches!(self, Side::Interior)
    }
}

/// Classification of a region by how many of its axes touch the boundary
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Interior,
    Face,
    Edge,
    Corner,
}

/// One block of the 27-way partition of the box
///
/// The interior, the six faces, the twelve edges and the eight corners are described by
/// which side of the box each axis sits on. Regions are disjoint and together they cover
/// every voxel exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: Side,
    pub y: Side,
    pub z: Side,
}

impl Region {
    pub const INTERIOR: Region = Region {
        x: Side::Interior,
        y: Side::Interior,
        z: Side::Interior,
    };

    pub fn new(x: Side, y: Side, z: Side) -> Self {
        Self { x, y, z }
    }

    /// All 27 regions, `z` varying slowest
    pub fn all() -> impl Iterator<Item = Region> {
        Side::ALL.into_iter().flat_map(|z| {
            Side::ALL
                .into_iter()
                .flat_map(move |y| Side::ALL.into_iter().map(move |x| Region { x, y, z }))
        })
    }

    /// The region a voxel belongs to
    pub fn containing(x: usize, y: usize, z: usize, shape: &Shape) -> Self {
        Region {
            x: Side::of(x, shape.extent(Axis::X)),
            y: Side::of(y, shape.extent(Axis::Y)),
            z: Side::of(z, shape.extent(Axis::Z)),
        }
    }

    pub fn side(&self, axis: Axis) -> Side {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn kind(&self) -> RegionKind {
        match [self.x, self.y, self.z]
            .iter()
            .filter(|side| side.is_boundary())
            .count()
        {
            0 => RegionKind::Interior,
            1 => RegionKind::Face,
            2 => RegionKind::Edge,
            _ => RegionKind::Corner,
        }
    }

    /// Coordinate ranges along `[x, y, z]`
    pub fn ranges(&self, shape: &Shape) -> [Range<usize>; 3] {
        [
            self.x.range(shape.extent(Axis::X)),
            self.y.range(shape.extent(Axis::Y)),
            self.z.range(shape.extent(Axis::Z)),
        ]
    }

    /// Coordinate ranges with the `z` range clipped to `planes`
    ///
    /// The clipped `z` range is empty when the region lies outside `planes`.
    pub fn ranges_within(&self, shape: &Shape, planes: &Range<usize>) -> [Range<usize>; 3] {
        let [x, y, z] = self.ranges(shape);
        let z = z.start.max(planes.start)..z.end.min(planes.end);
        let z = if z.start < z.end { z } else { z.start..z.start };
        [x, y, z]
    }

    pub fn voxel_count(&self, shape: &Shape) -> usize {
        self.ranges(shape).iter().map(|range| range.len()).product()
    }

    pub fn contains(&self, x: usize, y: usize, z: usize, shape: &Shape) -> bool {
        let [rx, ry, rz] = self.ranges(shape);
        rx.contains(&x) && ry.contains(&y) && rz.contains(&z)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn there_are_twenty_seven_regions_of_each_expected_kind() {
        let kinds = Region::all().map(|region| region.kind()).collect::<Vec<_>>();
        assert_eq!(kinds.len(), 27);
        let count = |kind| kinds.iter().filter(|&&k| k == kind).count();
        assert_eq!(count(RegionKind::Interior), 1);
        assert_eq!(count(RegionKind::Face), 6);
        assert_eq!(count(RegionKind::Edge), 12);
        assert_eq!(count(RegionKind::Corner), 8);
    }

    #[test]
    fn every_voxel_of_a_small_cube_is_covered_exactly_once() {
        let shape = Shape::cube(4).unwrap();
        let mut visits = vec![0_usize; shape.len()];
        for region in Region::all() {
            let [xs, ys, zs] = region.ranges(&shape);
            for z in zs {
                for y in ys.clone() {
                    for x in xs.clone() {
                        visits[shape.index(x, y, z)] += 1;
                    }
                }
            }
        }
        assert!(visits.iter().all(|&count| count == 1));
    }

    #[test]
    fn corners_are_single_voxels() {
        let shape = Shape::new(5, 4, 3).unwrap();
        for region in Region::all().filter(|r| r.kind() == RegionKind::Corner) {
            assert_eq!(region.voxel_count(&shape), 1);
        }
    }

    #[test]
    fn clipping_to_planes_outside_the_region_is_empty() {
        let shape = Shape::cube(6).unwrap();
        let region = Region::new(Side::Interior, Side::Interior, Side::Min);
        let [_, _, z] = region.ranges_within(&shape, &(2..4));
        assert!(z.is_empty());
        let [_, _, z] = Region::INTERIOR.ranges_within(&shape, &(0..3));
        assert_eq!(z, 1..3);
    }

    proptest! {
        #[test]
        fn regions_partition_any_valid_box(x in 3_usize..9, y in 3_usize..9, z in 3_usize..9) {
            let shape = Shape::new(x, y, z).unwrap();
            let total: usize = Region::all().map(|region| region.voxel_count(&shape)).sum();
            prop_assert_eq!(total, shape.len());
            for index in 0..shape.len() {
                let (vx, vy, vz) = shape.coordinates(index);
                let owners = Region::all()
                    .filter(|region| region.contains(vx, vy, vz, &shape))
                    .collect::<Vec<_>>();
                prop_assert_eq!(owners, vec![Region::containing(vx, vy, vz, &shape)]);
            }
        }
    }
}
