//! Write step statistics as text or CSV.

use crate::{timing, Result, StepStats, Summary};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

impl fmt::Display for StepStats {
    /// One line per step, plus a distance line if the step has connections.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "step {}: vehicles: {}, edges: {}", self.step, self.vehicles, self.edges)?;
        if let Some(distances) = self.distances {
            write!(f,
                   "\nstep {}: connections: {}, avgDistance: {}, maxDistance: {}",
                   self.step,
                   distances.connections,
                   distances.average,
                   distances.max)?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Records: {}", self.records)?;
        writeln!(f, "Skipped: {}", self.skipped)?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Vehicles: {}", self.vehicles)?;
        write!(f, "MAC addresses: {}", self.macs)?;
        if self.unknown_macs > 0 {
            write!(f, "\nUnknown MAC addresses: {}", self.unknown_macs)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Row {
    step: f64,
    time: f64,
    clock: String,
    vehicles: usize,
    edges: usize,
    connections: usize,
    unresolved: usize,
    avg_distance: Option<f64>,
    max_distance: Option<f64>,
}

impl<'a> From<&'a StepStats> for Row {
    fn from(stats: &'a StepStats) -> Row {
        Row {
            step: stats.step,
            time: timing::seconds(stats.time),
            clock: timing::clock(stats.time),
            vehicles: stats.vehicles,
            edges: stats.edges,
            connections: stats.distances.map_or(0, |d| d.connections),
            unresolved: stats.unresolved,
            avg_distance: stats.distances.map(|d| d.average),
            max_distance: stats.distances.map(|d| d.max),
        }
    }
}

/// Writes one CSV row per step.
///
/// The header row is written with the first step, so a log without steps produces an empty file.
#[allow(missing_debug_implementations)]
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReport<File> {
    /// Creates a CSV report file, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<CsvReport<File>> {
        Ok(CsvReport { writer: csv::Writer::from_path(path)? })
    }
}

impl<W: Write> CsvReport<W> {
    /// Writes CSV rows to any writer.
    pub fn new(write: W) -> CsvReport<W> {
        CsvReport { writer: csv::Writer::from_writer(write) }
    }

    /// Writes a step's row.
    pub fn write(&mut self, stats: &StepStats) -> Result<()> {
        self.writer.serialize(Row::from(stats))?;
        Ok(())
    }

    /// Flushes the report and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error().into())
    }
}
