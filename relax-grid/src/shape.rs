use crate::GridError;
use std::fmt;

/// The three Cartesian axes of the box
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// The extents of a voxel box, fixed for the lifetime of a field
///
/// A `Shape` can only be built through [`Shape::new`], which guarantees every extent
/// is at least three, so the box always has a non-empty interior.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    x: usize,
    y: usize,
    z: usize,
}

impl Shape {
    pub fn new(x: usize, y: usize, z: usize) -> Result<Self, GridError> {
        for (axis, extent) in Axis::ALL.into_iter().zip([x, y, z]) {
            if extent < 3 {
                return Err(GridError::ExtentTooSmall { axis, extent });
            }
        }
        x.checked_mul(y)
            .and_then(|plane| plane.checked_mul(z))
            .ok_or(GridError::Overflow { x, y, z })?;
        Ok(Self { x, y, z })
    }

    /// A cube with `side` voxels along each axis
    pub fn cube(side: usize) -> Result<Self, GridError> {
        Self::new(side, side, side)
    }

    pub fn extent(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn extents(&self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.x * self.y * self.z
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of voxels in a single `z` plane
    pub fn plane_len(&self) -> usize {
        self.x * self.y
    }

    /// Flat offset of voxel `(x, y, z)`
    ///
    /// No bounds are checked: the sweep only ever asks for coordinates it derived from the
    /// shape itself.
    #[inline(always)]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.y + y) * self.x + x
    }

    /// Inverse of [`Shape::index`]
    pub fn coordinates(&self, index: usize) -> (usize, usize, usize) {
        let x = index % self.x;
        let y = (index / self.x) % self.y;
        let z = index / self.plane_len();
        (x, y, z)
    }

    /// Distance between neighbouring voxels along `axis` in the flat buffer
    #[inline(always)]
    pub fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => 1,
            Axis::Y => self.x,
            Axis::Z => self.plane_len(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extents_below_three_are_rejected() {
        for (extents, axis) in [
            ([2, 5, 5], Axis::X),
            ([5, 1, 5], Axis::Y),
            ([5, 5, 0], Axis::Z),
        ] {
            match Shape::new(extents[0], extents[1], extents[2]) {
                Err(GridError::ExtentTooSmall { axis: found, .. }) => assert_eq!(found, axis),
                other => panic!("expected an extent error, got {:?}", other),
            }
        }
    }

    #[test]
    fn overflowing_shapes_are_rejected() {
        assert!(matches!(
            Shape::new(usize::MAX, 3, 3),
            Err(GridError::Overflow { .. })
        ));
    }

    #[test]
    fn index_is_row_major_with_x_fastest() {
        let shape = Shape::new(4, 5, 6).unwrap();
        assert_eq!(shape.index(0, 0, 0), 0);
        assert_eq!(shape.index(1, 0, 0), 1);
        assert_eq!(shape.index(0, 1, 0), 4);
        assert_eq!(shape.index(0, 0, 1), 20);
        assert_eq!(shape.index(3, 4, 5), shape.len() - 1);
    }

    #[test]
    fn coordinates_invert_index() {
        let shape = Shape::new(3, 4, 5).unwrap();
        for index in 0..shape.len() {
            let (x, y, z) = shape.coordinates(index);
            assert_eq!(shape.index(x, y, z), index);
        }
    }

    #[test]
    fn strides_step_to_the_neighbouring_voxel() {
        let shape = Shape::new(7, 6, 5).unwrap();
        let centre = shape.index(3, 3, 3);
        assert_eq!(centre + shape.stride(Axis::X), shape.index(4, 3, 3));
        assert_eq!(centre + shape.stride(Axis::Y), shape.index(3, 4, 3));
        assert_eq!(centre + shape.stride(Axis::Z), shape.index(3, 3, 4));
    }
}
