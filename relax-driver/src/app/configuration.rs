use super::DriverError;
use config::{Config, Environment, File};
use relax_poisson::SolverSettings;
use serde::{de::DeserializeOwned, Deserialize};
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Deserialize)]
pub(crate) struct Configuration<T> {
    pub(crate) grid: GridConfiguration<T>,
    pub(crate) source: SourceConfiguration<T>,
    pub(crate) solver: SolverSettings<T>,
    pub(crate) scan: ScanConfiguration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GridConfiguration<T> {
    /// Number of voxels along each side of the cube
    pub(crate) size: usize,
    pub(crate) spacing: T,
    pub(crate) boundary_value: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourceConfiguration<T> {
    /// Source value at the centre voxel
    pub(crate) charge: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScanConfiguration {
    pub(crate) min_size: usize,
    pub(crate) max_size: usize,
    pub(crate) size_step: usize,
    pub(crate) iterations: Vec<usize>,
    pub(crate) threads: Vec<usize>,
    pub(crate) log: PathBuf,
}

impl<T: DeserializeOwned> Configuration<T> {
    /// Read `default.toml` from `directory`, overridden by `{RUN_MODE}.toml` when present
    /// and finally by `RELAX`-prefixed environment variables
    pub(crate) fn build(directory: &Path) -> Result<Self, DriverError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        tracing::debug!("Reading configuration from {:?} in {run_mode} mode", directory);

        let s = Config::builder()
            .add_source(File::from(directory.join("default")))
            .add_source(File::from(directory.join(&run_mode)).required(false))
            .add_source(Environment::with_prefix("RELAX").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    #[cfg(test)]
    fn from_toml(contents: &str) -> Result<Self, DriverError> {
        let s = Config::builder()
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}
