//! Timing records, one per solve, in a plain text log
//!
//! ```text
//! Thread count: 4 Size: 150  Iterations: 100
//! Time (s): 1.234
//! ```

use super::DriverError;
use std::{
    collections::BTreeMap,
    fs,
    io::{BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

const THREADS: &str = "Thread count: ";
const SIZE: &str = "Size: ";
const ITERATIONS: &str = "Iterations: ";
const TIME: &str = "Time (s): ";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingRecord {
    pub threads: usize,
    pub size: usize,
    pub iterations: usize,
    pub seconds: f64,
}

impl TimingRecord {
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{THREADS}{} {SIZE}{}  {ITERATIONS}{}",
            self.threads, self.size, self.iterations
        )?;
        writeln!(writer, "{TIME}{}", self.seconds)
    }
}

/// The first whitespace delimited token following `label` in `line`
fn value_after<V: FromStr>(line: &str, label: &str) -> Option<V> {
    let (_, tail) = line.split_once(label)?;
    tail.split_whitespace().next()?.parse().ok()
}

/// Parse every complete record in a timing log
///
/// Lines which belong to neither half of a record are skipped. A time with no preceding
/// header, or a header whose fields do not parse, is an error.
pub fn parse_timing_log<R: BufRead>(
    reader: R,
    path: &Path,
) -> Result<Vec<TimingRecord>, DriverError> {
    let malformed = |line: usize, content: &str| DriverError::MalformedTimingLog {
        path: path.to_path_buf(),
        line,
        content: content.to_string(),
    };

    let mut records = Vec::new();
    let mut pending: Option<(usize, usize, usize)> = None;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.contains(THREADS) {
            let header = (|| {
                Some((
                    value_after(&line, THREADS)?,
                    value_after(&line, SIZE)?,
                    value_after(&line, ITERATIONS)?,
                ))
            })();
            pending = Some(header.ok_or_else(|| malformed(index + 1, &line))?);
        } else if line.contains(TIME) {
            let (threads, size, iterations) = pending
                .take()
                .ok_or_else(|| malformed(index + 1, &line))?;
            let seconds = value_after(&line, TIME).ok_or_else(|| malformed(index + 1, &line))?;
            records.push(TimingRecord {
                threads,
                size,
                iterations,
                seconds,
            });
        }
    }
    Ok(records)
}

pub fn read_timing_log(path: &Path) -> Result<Vec<TimingRecord>, DriverError> {
    let file = fs::File::open(path)?;
    parse_timing_log(BufReader::new(file), path)
}

/// One row per distinct `(threads, size, iterations)`, holding the mean time over every run
/// of that configuration and the number of runs averaged
///
/// Rows are ordered by thread count, then size, then iterations.
pub fn mean_timings(records: &[TimingRecord]) -> Vec<(TimingRecord, usize)> {
    let mut totals = BTreeMap::new();
    for record in records {
        let (seconds, runs) = totals
            .entry((record.threads, record.size, record.iterations))
            .or_insert((0.0, 0));
        *seconds += record.seconds;
        *runs += 1;
    }
    totals
        .into_iter()
        .map(|((threads, size, iterations), (seconds, runs))| {
            (
                TimingRecord {
                    threads,
                    size,
                    iterations,
                    seconds: seconds / runs as f64,
                },
                runs,
            )
        })
        .collect()
}
