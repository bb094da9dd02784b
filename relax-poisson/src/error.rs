use miette::Diagnostic;
use relax_grid::{GridError, Shape};

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Failures of a single solve, none of which are retried
pub enum SolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grid(#[from] GridError),
    #[error("the initial potential is defined on a {found} box but the source on a {expected} box")]
    #[diagnostic(code(relax_poisson::shape_mismatch))]
    ShapeMismatch { expected: Shape, found: Shape },
    #[error("the output buffer holds {found} values but the box has {expected} voxels")]
    #[diagnostic(code(relax_poisson::output_length))]
    OutputLength { expected: usize, found: usize },
    #[error("the {0} must be finite")]
    #[diagnostic(code(relax_poisson::non_finite))]
    NonFinite(&'static str),
    #[error("failed to build the worker pool")]
    #[diagnostic(code(relax_poisson::thread_pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("halo worker {0} panicked")]
    #[diagnostic(code(relax_poisson::worker_panicked))]
    WorkerPanicked(usize),
}
