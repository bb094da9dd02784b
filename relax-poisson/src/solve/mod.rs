//! The iteration driver
//!
//! Repeats a sweep for a fixed number of iterations, rotating the current and next buffers
//! between sweeps. The caller's output buffer is one of the two rotating buffers, so after
//! an even number of swapped sweeps the last iterate lives in the scratch buffer and one
//! final copy brings it home.

use crate::{
    sweep::{max_change, sweep_planes, PlaneWindow},
    Convergence, Stencil, UpdateStrategy,
};
use nalgebra::RealField;
use relax_grid::{Axis, Shape};

/// The lifecycle of a relaxation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SolverState {
    Initializing,
    Iterating { iteration: usize },
    Done { iterations: usize },
}

impl SolverState {
    /// Sweeps finished before this state was entered
    pub(crate) fn completed(&self) -> usize {
        match *self {
            SolverState::Initializing => 0,
            SolverState::Iterating { iteration } => iteration,
            SolverState::Done { iterations } => iterations,
        }
    }
}

/// What a finished relaxation reports beside the potential itself
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Progress<T> {
    pub(crate) iterations: usize,
    pub(crate) last_change: Option<T>,
}

/// One complete sweep of the box from `current` into `next`
pub(crate) trait Sweep<T: Copy + RealField> {
    /// Returns the largest change of any voxel when `track_change` is set
    fn sweep(&self, current: &[T], next: &mut [T], track_change: bool) -> Option<T>;
}

/// Sweeps the whole box on the calling thread
pub(crate) struct Sequential<'a, T> {
    pub(crate) shape: Shape,
    pub(crate) source: &'a [T],
    pub(crate) stencil: Stencil<T>,
}

impl<T: Copy + RealField> Sweep<T> for Sequential<'_, T> {
    fn sweep(&self, current: &[T], next: &mut [T], track_change: bool) -> Option<T> {
        sweep_planes(
            &self.shape,
            0..self.shape.extent(Axis::Z),
            PlaneWindow::whole(current),
            self.source,
            next,
            &self.stencil,
        );
        track_change.then(|| max_change(current, next))
    }
}

/// Run sweeps until the iteration budget is spent or the tolerance is met
///
/// `scratch` holds the initial potential on entry and is clobbered. On return `output` holds
/// the final iterate whatever the parity of the number of sweeps performed.
pub(crate) fn iterate<T, S>(
    sweeper: &S,
    convergence: &Convergence<T>,
    strategy: UpdateStrategy,
    scratch: &mut [T],
    output: &mut [T],
) -> Progress<T>
where
    T: Copy + RealField,
    S: Sweep<T>,
{
    let mut state = SolverState::Initializing;
    tracing::trace!(?state, ?strategy);
    let track_change = convergence.tolerance.is_some();

    let mut current: &mut [T] = scratch;
    let mut next: &mut [T] = output;
    let mut performed = 0;
    let mut last_change = None;

    for iteration in 0..convergence.iterations {
        state = SolverState::Iterating { iteration };
        let change = sweeper.sweep(current, next, track_change);
        performed += 1;
        match strategy {
            UpdateStrategy::Swap => std::mem::swap(&mut current, &mut next),
            UpdateStrategy::Copy => current.copy_from_slice(next),
        }
        last_change = change;
        tracing::trace!(?state, ?change);
        if convergence.is_converged(change) {
            tracing::debug!("Tolerance reached after {performed} sweeps");
            break;
        }
    }

    // `current` always holds the last iterate; `next` is the caller's buffer whenever
    // they differ.
    let needs_copy = match strategy {
        UpdateStrategy::Swap => performed % 2 == 0,
        UpdateStrategy::Copy => performed == 0,
    };
    if needs_copy {
        next.copy_from_slice(current);
    }

    state = SolverState::Done {
        iterations: performed,
    };
    tracing::trace!(?state);
    Progress {
        iterations: state.completed(),
        last_change,
    }
}
