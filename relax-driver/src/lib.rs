// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Relax
//!
//! A command line driver for the `relax-poisson` solver. It relaxes the potential of a point
//! charge held at the centre of a grounded cube, optionally dumping every voxel to a text file,
//! and times the solver over a range of cube sizes and worker counts.

pub mod app;
