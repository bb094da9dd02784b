use crate::{
    parallel::{relax_with_halos, resolve_workers, ForkJoin},
    solve::{iterate, Progress, Sequential},
    Decomposition, SolveError, SolverSettings, Stencil,
};
use nalgebra::RealField;
use relax_grid::{Axis, Field, Shape};
use std::marker::PhantomData;

/// The potential the relaxation starts from
#[derive(Copy, Clone, Debug)]
pub enum InitialGuess<'a, T: RealField> {
    /// A copy of the source field
    Source,
    /// Zero everywhere
    Zero,
    /// A field supplied by the caller, which must share the source's shape
    Field(&'a Field<T>),
}

pub struct PoissonProblemBuilder<'a, T: RealField, RefSource> {
    source: RefSource,
    initial: InitialGuess<'a, T>,
    boundary_value: Option<T>,
    spacing: Option<T>,
    marker: PhantomData<T>,
}

impl<'a, T: Copy + RealField> PoissonProblemBuilder<'a, T, ()> {
    pub fn new() -> Self {
        Self {
            source: (),
            initial: InitialGuess::Source,
            boundary_value: None,
            spacing: None,
            marker: PhantomData,
        }
    }
}

impl<'a, T: Copy + RealField> Default for PoissonProblemBuilder<'a, T, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Copy + RealField, RefSource> PoissonProblemBuilder<'a, T, RefSource> {
    /// Attach the source field, which fixes the shape of the problem
    pub fn with_source(self, source: &'a Field<T>) -> PoissonProblemBuilder<'a, T, &'a Field<T>> {
        PoissonProblemBuilder {
            source,
            initial: self.initial,
            boundary_value: self.boundary_value,
            spacing: self.spacing,
            marker: PhantomData,
        }
    }

    /// The potential held on all six faces, zero when not set
    pub fn with_boundary_value(mut self, boundary_value: T) -> Self {
        self.boundary_value = Some(boundary_value);
        self
    }

    /// The voxel spacing, one when not set
    pub fn with_spacing(mut self, spacing: T) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_initial_guess(mut self, initial: InitialGuess<'a, T>) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_initial_potential(self, initial: &'a Field<T>) -> Self {
        self.with_initial_guess(InitialGuess::Field(initial))
    }
}

impl<'a, T: Copy + RealField> PoissonProblemBuilder<'a, T, &'a Field<T>> {
    pub fn build(self) -> Result<PoissonProblem<'a, T>, SolveError> {
        let boundary_value = self.boundary_value.unwrap_or_else(T::zero);
        let spacing = self.spacing.unwrap_or_else(T::one);
        if !boundary_value.is_finite() {
            return Err(SolveError::NonFinite("boundary value"));
        }
        if !spacing.is_finite() {
            return Err(SolveError::NonFinite("voxel spacing"));
        }
        if let InitialGuess::Field(initial) = self.initial {
            if initial.shape() != self.source.shape() {
                return Err(SolveError::ShapeMismatch {
                    expected: *self.source.shape(),
                    found: *initial.shape(),
                });
            }
        }
        Ok(PoissonProblem {
            source: self.source,
            initial: self.initial,
            stencil: Stencil::new(boundary_value, spacing),
        })
    }
}

/// Poisson's equation on a box with a uniform Dirichlet boundary
#[derive(Debug)]
pub struct PoissonProblem<'a, T: RealField> {
    source: &'a Field<T>,
    initial: InitialGuess<'a, T>,
    stencil: Stencil<T>,
}

/// The result of a solve
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<T: RealField> {
    pub potential: Field<T>,
    /// Sweeps actually performed
    pub iterations: usize,
    /// Largest change made by the final sweep, when a tolerance was requested
    pub last_change: Option<T>,
    /// Workers actually used
    pub workers: usize,
}

/// Summary of a solve into a caller-owned buffer
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolveReport<T> {
    pub iterations: usize,
    pub last_change: Option<T>,
    pub workers: usize,
}

impl<'a, T: Copy + RealField + Send + Sync> PoissonProblem<'a, T> {
    pub fn shape(&self) -> &Shape {
        self.source.shape()
    }

    pub fn stencil(&self) -> &Stencil<T> {
        &self.stencil
    }

    fn initial_field(&self) -> Result<Field<T>, SolveError> {
        let shape = *self.shape();
        Ok(match self.initial {
            InitialGuess::Source => Field::try_from_slice(shape, self.source.as_slice())?,
            InitialGuess::Zero => Field::try_from_element(shape, T::zero())?,
            InitialGuess::Field(initial) => Field::try_from_slice(shape, initial.as_slice())?,
        })
    }

    /// Relax into a newly allocated potential field
    pub fn solve(&self, settings: &SolverSettings<T>) -> Result<Solution<T>, SolveError> {
        let mut potential = Field::try_from_element(*self.shape(), T::zero())?;
        let report = self.solve_into(settings, potential.as_mut_slice())?;
        Ok(Solution {
            potential,
            iterations: report.iterations,
            last_change: report.last_change,
            workers: report.workers,
        })
    }

    /// Relax into `output`, which must hold one value per voxel
    ///
    /// On error `output` is left untouched.
    #[tracing::instrument(name = "Poisson relaxation", level = "info", skip_all, fields(shape = %self.shape()))]
    pub fn solve_into(
        &self,
        settings: &SolverSettings<T>,
        output: &mut [T],
    ) -> Result<SolveReport<T>, SolveError> {
        let shape = *self.shape();
        if output.len() != shape.len() {
            return Err(SolveError::OutputLength {
                expected: shape.len(),
                found: output.len(),
            });
        }
        let workers = resolve_workers(settings.workers, shape.extent(Axis::Z));
        let mut scratch = self.initial_field()?;
        let source = self.source.as_slice();

        let Progress {
            iterations,
            last_change,
        } = match (workers, settings.decomposition) {
            (1, _) => {
                tracing::debug!("Sequential relaxation");
                let sweeper = Sequential {
                    shape,
                    source,
                    stencil: self.stencil,
                };
                iterate(
                    &sweeper,
                    &settings.convergence,
                    settings.strategy,
                    scratch.as_mut_slice(),
                    output,
                )
            }
            (_, Decomposition::ForkJoin) => {
                let sweeper = ForkJoin::new(shape, source, self.stencil, workers)?;
                iterate(
                    &sweeper,
                    &settings.convergence,
                    settings.strategy,
                    scratch.as_mut_slice(),
                    output,
                )
            }
            (_, Decomposition::Halo) => relax_with_halos(
                shape,
                source,
                self.stencil,
                &settings.convergence,
                workers,
                scratch.as_slice(),
                output,
            )?,
        };
        tracing::info!("Relaxation finished after {iterations} sweeps on {workers} workers");

        Ok(SolveReport {
            iterations,
            last_change,
            workers,
        })
    }
}

/// Solve Poisson's equation on a box with the potential fixed to `boundary_value` on every face
///
/// `source` is the flattened source field, indexed as `(z * y_extent + y) * x_extent + x`, and
/// also serves as the initial potential. Exactly `iterations` Jacobi sweeps are performed.
/// `workers` of `0` picks a worker count automatically and `1` runs sequentially.
pub fn poisson_dirichlet<T>(
    source: &[T],
    boundary_value: T,
    [x_extent, y_extent, z_extent]: [usize; 3],
    spacing: T,
    iterations: usize,
    workers: usize,
) -> Result<Vec<T>, SolveError>
where
    T: Copy + RealField + Send + Sync,
{
    let shape = Shape::new(x_extent, y_extent, z_extent)?;
    let source = Field::try_from_slice(shape, source)?;
    let problem = PoissonProblemBuilder::new()
        .with_source(&source)
        .with_boundary_value(boundary_value)
        .with_spacing(spacing)
        .build()?;
    let settings = SolverSettings::fixed(iterations).with_workers(workers);
    Ok(problem.solve(&settings)?.potential.into_vec())
}
