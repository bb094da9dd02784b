use nalgebra::RealField;

/// The seven point Jacobi update for the discrete Poisson equation
///
/// For a voxel with source `s` on a grid of spacing `h` the update is
/// $ \phi' = (\phi_{x+1} + \phi_{x-1} + \phi_{y+1} + \phi_{y-1} + \phi_{z+1} + \phi_{z-1} - h^2 s) / 6 $
/// where any neighbour falling outside the box takes the Dirichlet boundary value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stencil<T> {
    boundary: T,
    h_squared: T,
    six: T,
}

impl<T: Copy + RealField> Stencil<T> {
    pub fn new(boundary: T, spacing: T) -> Self {
        let three = T::one() + T::one() + T::one();
        Self {
            boundary,
            h_squared: spacing * spacing,
            six: three + three,
        }
    }

    /// The potential imposed on all six faces
    pub fn boundary(&self) -> T {
        self.boundary
    }

    /// Neighbours are ordered `[x+1, x-1, y+1, y-1, z+1, z-1]` and always summed in that
    /// order, so a voxel's new value never depends on which region or worker computed it.
    #[inline(always)]
    pub fn update(&self, neighbours: [T; 6], source: T) -> T {
        let [x_plus, x_minus, y_plus, y_minus, z_plus, z_minus] = neighbours;
        (x_plus + x_minus + y_plus + y_minus + z_plus + z_minus - self.h_squared * source)
            / self.six
    }
}
