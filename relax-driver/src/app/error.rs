// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! The error type for the binary

use miette::Diagnostic;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DriverError {
    #[error(transparent)]
    #[diagnostic(code(relax::io_error))]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    #[diagnostic(code(relax::config_error))]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grid(#[from] relax_grid::GridError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Solve(#[from] relax_poisson::SolveError),
    #[error("line {line} of the timing log {path:?} is malformed: {content:?}")]
    #[diagnostic(
        code(relax::timing_log),
        help("records are written as `Thread count: T Size: S  Iterations: I` followed by `Time (s): t`")
    )]
    MalformedTimingLog {
        path: PathBuf,
        line: usize,
        content: String,
    },
}
