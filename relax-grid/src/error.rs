use crate::Axis;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Errors raised while constructing grids and fields
pub enum GridError {
    #[error("the {axis} extent is {extent}, every extent must be at least 3")]
    #[diagnostic(
        code(relax_grid::extent_too_small),
        help("a box needs at least one interior voxel along each axis")
    )]
    ExtentTooSmall { axis: Axis, extent: usize },
    #[error("a grid of {x} x {y} x {z} voxels cannot be addressed")]
    #[diagnostic(code(relax_grid::overflow))]
    Overflow { x: usize, y: usize, z: usize },
    #[error("expected a buffer of {expected} values, found {found}")]
    #[diagnostic(code(relax_grid::length_mismatch))]
    LengthMismatch { expected: usize, found: usize },
    #[error("failed to allocate a buffer of {0} values")]
    #[diagnostic(code(relax_grid::allocation))]
    Allocation(usize, #[source] std::collections::TryReserveError),
}
