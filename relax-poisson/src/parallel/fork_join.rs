use crate::{
    solve::Sweep,
    sweep::{max_change, sweep_planes, PlaneWindow},
    SolveError, Stencil,
};
use nalgebra::RealField;
use rayon::prelude::*;
use relax_grid::{partition_planes, Axis, Shape};
use std::ops::Range;

/// Fork-join slab sweeps on a thread pool owned by a single solve
///
/// Every sweep splits the next buffer into one disjoint mutable slab per worker, while all
/// workers read the shared current buffer. Leaving the parallel scope is the barrier.
pub(crate) struct ForkJoin<'a, T> {
    shape: Shape,
    source: &'a [T],
    stencil: Stencil<T>,
    slabs: Vec<Range<usize>>,
    pool: rayon::ThreadPool,
}

impl<'a, T: Copy + RealField> ForkJoin<'a, T> {
    pub(crate) fn new(
        shape: Shape,
        source: &'a [T],
        stencil: Stencil<T>,
        workers: usize,
    ) -> Result<Self, SolveError> {
        let slabs = partition_planes(shape.extent(Axis::Z), workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(slabs.len())
            .thread_name(|index| format!("relax-slab-{index}"))
            .build()?;
        tracing::debug!("Fork-join decomposition into slabs {:?}", slabs);
        Ok(Self {
            shape,
            source,
            stencil,
            slabs,
            pool,
        })
    }
}

impl<T: Copy + RealField + Send + Sync> Sweep<T> for ForkJoin<'_, T> {
    fn sweep(&self, current: &[T], next: &mut [T], track_change: bool) -> Option<T> {
        let plane_len = self.shape.plane_len();
        let mut slabs = Vec::with_capacity(self.slabs.len());
        let mut rest = next;
        for planes in &self.slabs {
            let (slab, tail) = std::mem::take(&mut rest).split_at_mut(planes.len() * plane_len);
            slabs.push((planes.clone(), slab));
            rest = tail;
        }

        self.pool.install(|| {
            slabs
                .into_par_iter()
                .map(|(planes, slab)| {
                    let previous = &current[planes.start * plane_len..planes.end * plane_len];
                    sweep_planes(
                        &self.shape,
                        planes,
                        PlaneWindow::whole(current),
                        self.source,
                        slab,
                        &self.stencil,
                    );
                    track_change.then(|| max_change(previous, slab))
                })
                .reduce(
                    || None,
                    |a, b| match (a, b) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, None) => a,
                        (None, b) => b,
                    },
                )
        })
    }
}
