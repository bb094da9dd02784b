// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Jacobi relaxation of Poisson's equation on a three dimensional box
//!
//! The potential is fixed to a single value on all six faces of the box. Inside the
//! box each sweep replaces every voxel by the average of its six neighbours less the
//! scaled source term
//!
//! $ \phi'_{x,y,z} = (\phi_{x+1} + \phi_{x-1} + \phi_{y+1} + \phi_{y-1} + \phi_{z+1} + \phi_{z-1} - h^2 f) / 6 $
//!
//! where a neighbour which falls outside the box is replaced by the boundary value.
//! Sweeps may be shared between workers by splitting the box into slabs along `z`, and
//! every choice of worker count, decomposition and buffer strategy produces a bit for bit
//! identical result.

mod error;
mod parallel;
mod problem;
mod settings;
mod solve;
mod stencil;
pub mod sweep;

pub use error::SolveError;
pub use problem::{
    poisson_dirichlet, InitialGuess, PoissonProblem, PoissonProblemBuilder, Solution, SolveReport,
};
pub use settings::{Convergence, Decomposition, SolverSettings, UpdateStrategy};
pub use stencil::Stencil;
