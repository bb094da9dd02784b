//! Splitting the box into `z` slabs shared out between workers
//!
//! Each worker computes the sweep restricted to its own slab. No worker may start sweep
//! `i + 1` before every worker has finished sweep `i`, because the planes next to a slab
//! boundary read the neighbouring worker's values. Both decompositions enforce this with a
//! single synchronisation point per sweep and no other locking on the field itself.

mod fork_join;
mod halo;

pub(crate) use fork_join::ForkJoin;
pub(crate) use halo::relax_with_halos;

use std::num::NonZeroUsize;

/// The number of workers actually used for a box with `z_extent` planes
///
/// `0` asks for one worker per available core. Requests for more workers than there are
/// planes are clamped so no worker is left with an empty slab.
pub(crate) fn resolve_workers(requested: usize, z_extent: usize) -> usize {
    let workers = match requested {
        0 => std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
        n => n,
    };
    if workers > z_extent {
        tracing::warn!(
            "{workers} workers requested for {z_extent} planes, clamping to {z_extent}"
        );
        z_extent
    } else {
        workers
    }
}
