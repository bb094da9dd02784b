use crate::{GridError, Shape};
use nalgebra::{DVector, RealField};

/// A dense scalar field defined on every voxel of a box
///
/// Values are stored flat in the order given by [`Shape::index`]. Moving a `Field` moves
/// the handle to its buffer, never the values themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<T: RealField> {
    shape: Shape,
    values: DVector<T>,
}

impl<T: Copy + RealField> Field<T> {
    pub fn from_element(shape: Shape, element: T) -> Self {
        Self {
            shape,
            values: DVector::from_element(shape.len(), element),
        }
    }

    pub fn zeros(shape: Shape) -> Self {
        Self::from_element(shape, T::zero())
    }

    /// Wrap an existing flat buffer, which must hold exactly one value per voxel
    pub fn from_vec(shape: Shape, values: Vec<T>) -> Result<Self, GridError> {
        if values.len() != shape.len() {
            return Err(GridError::LengthMismatch {
                expected: shape.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            shape,
            values: DVector::from_vec(values),
        })
    }

    /// Allocate a field filled with `element`, reporting allocation failure
    pub fn try_from_element(shape: Shape, element: T) -> Result<Self, GridError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(shape.len())
            .map_err(|e| GridError::Allocation(shape.len(), e))?;
        buffer.resize(shape.len(), element);
        Self::from_vec(shape, buffer)
    }

    /// Copy a flat slice into a freshly allocated field
    ///
    /// Allocation failure is reported rather than aborting the process.
    pub fn try_from_slice(shape: Shape, values: &[T]) -> Result<Self, GridError> {
        if values.len() != shape.len() {
            return Err(GridError::LengthMismatch {
                expected: shape.len(),
                found: values.len(),
            });
        }
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(values.len())
            .map_err(|e| GridError::Allocation(values.len(), e))?;
        buffer.extend_from_slice(values);
        Self::from_vec(shape, buffer)
    }

    /// Build a field by evaluating `f(x, y, z)` on every voxel
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let values = (0..shape.len())
            .map(|index| {
                let (x, y, z) = shape.coordinates(index);
                f(x, y, z)
            })
            .collect::<Vec<_>>();
        Self {
            shape,
            values: DVector::from_vec(values),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.values[self.shape.index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let index = self.shape.index(x, y, z);
        self.values[index] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        self.values.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.values.as_mut_slice()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values.data.into()
    }

}
