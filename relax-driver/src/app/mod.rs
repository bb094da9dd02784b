/// This module governs the command line driver: a point charge relaxation, a timing scan and
/// a summary of recorded timings
mod configuration;
mod dump;
mod error;
mod scan;
mod scenario;
mod telemetry;

pub(crate) use configuration::Configuration;
pub use dump::write_dump;
pub use error::DriverError;
pub use scan::{mean_timings, parse_timing_log, read_timing_log, TimingRecord};
pub use scenario::point_charge;

use clap::{ArgEnum, Args, Parser, Subcommand};
use nalgebra::RealField;
use relax_poisson::{Decomposition, PoissonProblemBuilder, SolverSettings};
use serde::de::DeserializeOwned;
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::BufWriter,
    path::PathBuf,
    time::Instant,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    #[clap(arg_enum, short, long, default_value = "info")]
    log_level: LogLevel,
    /// Directory holding `default.toml` and any run mode overrides
    #[clap(short, long, default_value = "../.config")]
    config_dir: PathBuf,
    /// Directory receiving the json log
    #[clap(long, default_value = "../results")]
    results_dir: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Relax the potential of a point charge at the centre of a grounded cube
    Run(RunArgs),
    /// Time the solver over a range of cube sizes and worker counts
    Scan(ScanArgs),
    /// Summarise a timing log, averaging repeated runs of each configuration
    Summary(SummaryArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Voxels along each side of the cube
    #[clap(short, long)]
    size: Option<usize>,
    #[clap(short, long)]
    iterations: Option<usize>,
    /// Worker count, 0 picks one per core
    #[clap(short, long)]
    threads: Option<usize>,
    #[clap(arg_enum, short, long)]
    decomposition: Option<DecompositionArg>,
    /// Write every voxel of the final potential to this file
    #[clap(long)]
    dump: Option<PathBuf>,
}

#[derive(Args)]
struct ScanArgs {
    #[clap(long)]
    min_size: Option<usize>,
    /// Exclusive upper bound on the cube size
    #[clap(long)]
    max_size: Option<usize>,
    #[clap(long)]
    size_step: Option<usize>,
    #[clap(short, long, use_value_delimiter = true)]
    iterations: Option<Vec<usize>>,
    #[clap(short, long, use_value_delimiter = true)]
    threads: Option<Vec<usize>>,
    #[clap(arg_enum, short, long)]
    decomposition: Option<DecompositionArg>,
    /// Timing log, appended to
    #[clap(long)]
    log: Option<PathBuf>,
}

#[derive(Args)]
struct SummaryArgs {
    /// Timing log to read, the scan log from the configuration when not given
    #[clap(long)]
    log: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", level)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
enum DecompositionArg {
    ForkJoin,
    Halo,
}

impl From<DecompositionArg> for Decomposition {
    fn from(arg: DecompositionArg) -> Self {
        match arg {
            DecompositionArg::ForkJoin => Decomposition::ForkJoin,
            DecompositionArg::Halo => Decomposition::Halo,
        }
    }
}

pub fn run<T>() -> color_eyre::Result<()>
where
    T: Copy + DeserializeOwned + RealField + Send + Sync,
{
    color_eyre::install()?;
    let cli = App::parse();

    fs::create_dir_all(&cli.results_dir)?;
    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, &cli.results_dir);
    telemetry::init_subscriber(subscriber)?;

    let config: Configuration<T> = Configuration::build(&cli.config_dir)?;

    match cli.command {
        Command::Run(args) => relax_point_charge(config, args)?,
        Command::Scan(args) => scan(config, args)?,
        Command::Summary(args) => summarise(config, args)?,
    }
    Ok(())
}

#[tracing::instrument(name = "Point charge", skip_all)]
fn relax_point_charge<T>(config: Configuration<T>, args: RunArgs) -> Result<(), DriverError>
where
    T: Copy + RealField + Send + Sync,
{
    let size = args.size.unwrap_or(config.grid.size);
    let mut settings = config.solver;
    if let Some(iterations) = args.iterations {
        settings.convergence.iterations = iterations;
    }
    if let Some(threads) = args.threads {
        settings.workers = threads;
    }
    if let Some(decomposition) = args.decomposition {
        settings.decomposition = decomposition.into();
    }

    let source = point_charge(size, config.source.charge)?;
    let problem = PoissonProblemBuilder::new()
        .with_source(&source)
        .with_boundary_value(config.grid.boundary_value)
        .with_spacing(config.grid.spacing)
        .build()?;

    let start = Instant::now();
    let solution = problem.solve(&settings)?;
    let elapsed = start.elapsed();
    tracing::info!(
        "Relaxed a {} cube in {} sweeps on {} workers",
        problem.shape(),
        solution.iterations,
        solution.workers
    );
    println!("Time (s): {}", elapsed.as_secs_f64());

    if let Some(path) = args.dump {
        tracing::info!("Writing the potential to {:?}", path);
        write_dump(&solution.potential, BufWriter::new(fs::File::create(path)?))?;
    }
    Ok(())
}

#[tracing::instrument(name = "Timing scan", skip_all)]
fn scan<T>(config: Configuration<T>, args: ScanArgs) -> Result<(), DriverError>
where
    T: Copy + RealField + Send + Sync,
{
    let min_size = args.min_size.unwrap_or(config.scan.min_size);
    let max_size = args.max_size.unwrap_or(config.scan.max_size);
    let size_step = args.size_step.unwrap_or(config.scan.size_step).max(1);
    let iterations = args.iterations.unwrap_or(config.scan.iterations);
    let threads = args.threads.unwrap_or(config.scan.threads);
    let decomposition = args
        .decomposition
        .map(Decomposition::from)
        .unwrap_or(config.solver.decomposition);
    let path = args.log.unwrap_or(config.scan.log);

    let mut log = OpenOptions::new().create(true).append(true).open(&path)?;
    for &workers in &threads {
        for size in (min_size..max_size).step_by(size_step) {
            let source = point_charge(size, config.source.charge)?;
            let problem = PoissonProblemBuilder::new()
                .with_source(&source)
                .with_boundary_value(config.grid.boundary_value)
                .with_spacing(config.grid.spacing)
                .build()?;
            for &sweeps in &iterations {
                let settings = SolverSettings::fixed(sweeps)
                    .with_workers(workers)
                    .with_decomposition(decomposition)
                    .with_strategy(config.solver.strategy);
                let start = Instant::now();
                problem.solve(&settings)?;
                let record = TimingRecord {
                    threads: workers,
                    size,
                    iterations: sweeps,
                    seconds: start.elapsed().as_secs_f64(),
                };
                tracing::info!(?record);
                record.write(&mut log)?;
            }
        }
    }
    tracing::info!("Appended timings to {:?}", path);
    Ok(())
}

fn summarise<T>(config: Configuration<T>, args: SummaryArgs) -> Result<(), DriverError> {
    let path = args.log.unwrap_or(config.scan.log);
    let records = read_timing_log(&path)?;
    tracing::info!("Read {} timing records from {:?}", records.len(), path);
    for (record, runs) in mean_timings(&records) {
        println!(
            "Thread count: {} Size: {}  Iterations: {}  Mean time (s): {:.6} over {} runs",
            record.threads, record.size, record.iterations, record.seconds, runs
        );
    }
    Ok(())
}
