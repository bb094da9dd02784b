use crate::{
    solve::{Progress, SolverState},
    sweep::{max_change, sweep_planes, PlaneWindow},
    Convergence, SolveError, Stencil,
};
use nalgebra::RealField;
use parking_lot::Mutex;
use relax_grid::{partition_planes, Axis, GridError, Shape};
use std::{
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::Barrier,
};

/// The planes a worker publishes for its neighbours, double buffered on sweep parity
///
/// A slot written during sweep `i` is read by the neighbours after the barrier of sweep `i`
/// and only rewritten during sweep `i + 2`, which no worker can reach before every reader
/// has passed the barrier of sweep `i + 1`. One barrier per sweep is therefore enough.
struct HaloSlots<T> {
    lower: [Mutex<Vec<T>>; 2],
    upper: [Mutex<Vec<T>>; 2],
    change: [Mutex<Option<T>>; 2],
}

impl<T: Copy + RealField> HaloSlots<T> {
    fn new(plane_len: usize) -> Self {
        let plane = || Mutex::new(vec![T::zero(); plane_len]);
        Self {
            lower: [plane(), plane()],
            upper: [plane(), plane()],
            change: [Mutex::new(None), Mutex::new(None)],
        }
    }
}

/// A worker's private copy of its slab plus one halo plane towards each neighbour
struct SlabWorker<T> {
    index: usize,
    planes: Range<usize>,
    /// The box plane stored first in `current` and `next`
    window_start: usize,
    /// The values of `current` and `next` which this worker computes
    owned: Range<usize>,
    current: Vec<T>,
    next: Vec<T>,
}

struct FinishedSlab<T> {
    planes: Range<usize>,
    owned: Range<usize>,
    values: Vec<T>,
    progress: Progress<T>,
}

fn try_to_vec<T: Copy>(values: &[T]) -> Result<Vec<T>, GridError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(values.len())
        .map_err(|e| GridError::Allocation(values.len(), e))?;
    buffer.extend_from_slice(values);
    Ok(buffer)
}

impl<T: Copy + RealField + Send + Sync> SlabWorker<T> {
    /// Publish this worker's boundary planes and largest change into the slots of `parity`
    fn publish(&self, slots: &HaloSlots<T>, parity: usize, plane_len: usize, track_change: bool) {
        slots.lower[parity]
            .lock()
            .copy_from_slice(&self.next[self.owned.start..self.owned.start + plane_len]);
        slots.upper[parity]
            .lock()
            .copy_from_slice(&self.next[self.owned.end - plane_len..self.owned.end]);
        *slots.change[parity].lock() = track_change.then(|| {
            max_change(
                &self.current[self.owned.clone()],
                &self.next[self.owned.clone()],
            )
        });
    }

    /// A panicking sweep is caught and recorded in `failure`, so the worker still arrives at
    /// the barrier and every worker leaves the loop on the same sweep.
    #[allow(clippy::too_many_arguments)]
    fn run(
        mut self,
        shape: Shape,
        source: &[T],
        stencil: Stencil<T>,
        convergence: &Convergence<T>,
        slots: &[HaloSlots<T>],
        barrier: &Barrier,
        failure: &Mutex<Option<usize>>,
    ) -> Result<FinishedSlab<T>, SolveError> {
        let plane_len = shape.plane_len();
        let top_halo = self.current.len() - plane_len;
        let has_lower_neighbour = self.index > 0;
        let has_upper_neighbour = self.index + 1 < slots.len();
        let track_change = convergence.tolerance.is_some();

        let mut state = SolverState::Initializing;
        let mut last_change = None;
        for iteration in 0..convergence.iterations {
            state = SolverState::Iterating { iteration };
            let parity = iteration % 2;
            let swept = panic::catch_unwind(AssertUnwindSafe(|| {
                sweep_planes(
                    &shape,
                    self.planes.clone(),
                    PlaneWindow::new(&self.current, self.window_start),
                    source,
                    &mut self.next[self.owned.clone()],
                    &stencil,
                );
                self.publish(&slots[self.index], parity, plane_len, track_change);
            }));
            if swept.is_err() {
                failure.lock().get_or_insert(self.index);
            }

            barrier.wait();

            if let Some(index) = *failure.lock() {
                return Err(SolveError::WorkerPanicked(index));
            }
            if has_lower_neighbour {
                self.next[..plane_len]
                    .copy_from_slice(&slots[self.index - 1].upper[parity].lock());
            }
            if has_upper_neighbour {
                self.next[top_halo..].copy_from_slice(&slots[self.index + 1].lower[parity].lock());
            }
            let change = slots
                .iter()
                .filter_map(|slot| *slot.change[parity].lock())
                .reduce(|a, b| a.max(b));

            std::mem::swap(&mut self.current, &mut self.next);
            last_change = change;
            if self.index == 0 {
                tracing::trace!(?state, ?change, "Halo sweep complete");
            }
            if convergence.is_converged(change) {
                state = SolverState::Done {
                    iterations: iteration + 1,
                };
                break;
            }
        }
        if let SolverState::Iterating { iteration } = state {
            state = SolverState::Done {
                iterations: iteration + 1,
            };
        }
        if self.index == 0 {
            tracing::trace!(?state);
        }

        Ok(FinishedSlab {
            planes: self.planes,
            owned: self.owned,
            values: self.current,
            progress: Progress {
                iterations: state.completed(),
                last_change,
            },
        })
    }
}

/// Relax with one persistent thread per slab, writing the final iterate into `output`
///
/// Every buffer is allocated before any thread starts, so an allocation failure leaves
/// `output` untouched and no worker waiting on the barrier.
pub(crate) fn relax_with_halos<T>(
    shape: Shape,
    source: &[T],
    stencil: Stencil<T>,
    convergence: &Convergence<T>,
    workers: usize,
    initial: &[T],
    output: &mut [T],
) -> Result<Progress<T>, SolveError>
where
    T: Copy + RealField + Send + Sync,
{
    let z_extent = shape.extent(Axis::Z);
    let plane_len = shape.plane_len();
    let slabs = partition_planes(z_extent, workers);
    tracing::debug!("Halo decomposition into slabs {:?}", slabs);

    let mut slab_workers = Vec::with_capacity(slabs.len());
    for (index, planes) in slabs.iter().cloned().enumerate() {
        let window_start = planes.start.saturating_sub(1);
        let window_end = (planes.end + 1).min(z_extent);
        let window = &initial[window_start * plane_len..window_end * plane_len];
        let owned = (planes.start - window_start) * plane_len..(planes.end - window_start) * plane_len;
        slab_workers.push(SlabWorker {
            index,
            planes,
            window_start,
            owned,
            current: try_to_vec(window)?,
            next: try_to_vec(window)?,
        });
    }
    let slots = slabs
        .iter()
        .map(|_| HaloSlots::new(plane_len))
        .collect::<Vec<_>>();
    let barrier = Barrier::new(slabs.len());
    let failure = Mutex::new(None);

    let finished = std::thread::scope(|scope| {
        let handles = slab_workers
            .into_iter()
            .map(|worker| {
                let (slots, barrier, failure) = (&slots, &barrier, &failure);
                scope.spawn(move || {
                    worker.run(shape, source, stencil, convergence, slots, barrier, failure)
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                handle
                    .join()
                    .map_err(|_| SolveError::WorkerPanicked(index))?
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut progress = Progress {
        iterations: 0,
        last_change: None,
    };
    for slab in finished {
        output[slab.planes.start * plane_len..slab.planes.end * plane_len]
            .copy_from_slice(&slab.values[slab.owned]);
        progress = slab.progress;
    }
    Ok(progress)
}
