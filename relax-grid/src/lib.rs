// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Regular three dimensional voxel grids
//!
//! This crate provides the geometry used by the relaxation solver: the extents of a
//! box of voxels and the flattening rule mapping a coordinate `(x, y, z)` onto an
//! offset `(z * Y + y) * X + x` in a dense buffer, owned dense fields defined on the box,
//! the partition of the box into an interior, six faces, twelve edges and eight corners,
//! and the split of the `z` axis into contiguous slabs for parallel workers.

mod decompose;
mod error;
mod field;
mod region;
mod shape;

pub use decompose::*;
pub use error::GridError;
pub use field::*;
pub use region::*;
pub use shape::*;
