use nalgebra::RealField;
use serde::Deserialize;

/// When the relaxation stops
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Convergence<T> {
    /// The number of sweeps to perform
    pub iterations: usize,
    /// Stop early once a sweep changes no voxel by more than this. The check is only made
    /// between sweeps. `None` always runs the full `iterations`.
    pub tolerance: Option<T>,
}

impl<T: Copy + RealField> Convergence<T> {
    pub fn fixed(iterations: usize) -> Self {
        Self {
            iterations,
            tolerance: None,
        }
    }

    pub(crate) fn is_converged(&self, change: Option<T>) -> bool {
        matches!((self.tolerance, change), (Some(tolerance), Some(change)) if change <= tolerance)
    }
}

/// How the `z` slabs are shared between workers
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decomposition {
    /// Fork-join over a per-solve rayon pool: every sweep splits the next buffer into
    /// disjoint slabs which all read the shared current buffer
    #[default]
    ForkJoin,
    /// Persistent workers owning private slabs, exchanging halo planes across a barrier
    /// once per sweep
    Halo,
}

/// How the roles of the current and next buffer are exchanged between sweeps
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStrategy {
    /// Swap the buffer handles
    #[default]
    Swap,
    /// Copy the next buffer back over the current buffer
    Copy,
}

/// Everything controlling a solve which is not part of the physical problem
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SolverSettings<T> {
    pub convergence: Convergence<T>,
    /// Number of workers, `0` picks one per available core and `1` runs sequentially
    #[serde(default)]
    pub workers: usize,
    #[serde(default)]
    pub decomposition: Decomposition,
    #[serde(default)]
    pub strategy: UpdateStrategy,
}

impl<T: Copy + RealField> SolverSettings<T> {
    /// A sequential solve running exactly `iterations` sweeps
    pub fn fixed(iterations: usize) -> Self {
        Self {
            convergence: Convergence::fixed(iterations),
            workers: 1,
            decomposition: Decomposition::default(),
            strategy: UpdateStrategy::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = decomposition;
        self
    }

    pub fn with_strategy(mut self, strategy: UpdateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.convergence.tolerance = Some(tolerance);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::de::{value::Error, value::MapDeserializer};

    #[test]
    fn a_missing_tolerance_runs_every_iteration() {
        let entries = vec![("iterations", 25usize)];
        let convergence =
            Convergence::<f64>::deserialize(MapDeserializer::<_, Error>::new(entries.into_iter()))
                .unwrap();
        assert_eq!(convergence, Convergence::fixed(25));
    }
}
