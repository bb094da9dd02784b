use nalgebra::RealField;
use relax_grid::{Field, GridError, Shape};

/// A cube of side `size` which is empty apart from `charge` in the centre voxel
pub fn point_charge<T: Copy + RealField>(size: usize, charge: T) -> Result<Field<T>, GridError> {
    let shape = Shape::cube(size)?;
    let mut source = Field::try_from_element(shape, T::zero())?;
    let centre = size / 2;
    source.set(centre, centre, centre, charge);
    Ok(source)
}
