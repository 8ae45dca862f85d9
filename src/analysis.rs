//! Scan a connectivity log step by step.

use crate::io::{LogFile, Read};
use crate::{Delimiter, Error, MacMap, Record, Result, Step, StepStats};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

/// Analysis options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    /// Neighbors are MAC addresses that should be resolved into vehicles.
    pub from_ns3: bool,
    /// Skip malformed lines and unresolvable neighbors instead of failing.
    pub lenient: bool,
    /// The field delimiter.
    pub delimiter: Delimiter,
}

/// Totals for a whole log.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// Records analysed.
    pub records: usize,
    /// Malformed lines skipped.
    pub skipped: usize,
    /// Steps reported.
    pub steps: usize,
    /// Distinct vehicle identifiers.
    pub vehicles: usize,
    /// Known MAC addresses, if neighbors were resolved.
    pub macs: usize,
    /// Neighbors dropped because their MAC address was unknown.
    pub unknown_macs: usize,
}

/// Groups records into steps and measures each step as it closes.
#[derive(Debug)]
pub struct Analyzer {
    config: Config,
    macs: Option<MacMap>,
    current: Option<Step>,
    unknown_macs: usize,
}

impl Analyzer {
    /// Creates a new analyzer.
    ///
    /// When `macs` is provided every neighbor is resolved through it before it is recorded.
    pub fn new(config: Config, macs: Option<MacMap>) -> Analyzer {
        Analyzer {
            config,
            macs,
            current: None,
            unknown_macs: 0,
        }
    }

    /// Adds a record, returning the statistics of the step it closes, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::{Analyzer, Config, Delimiter, Record};
    /// use vanet::io::Line;
    /// let mut analyzer = Analyzer::new(Config::default(), None);
    /// let first = Record::new(&Line { number: 1, text: "1,0,a,0,0,m1,0" }, Delimiter::default()).unwrap();
    /// let second = Record::new(&Line { number: 2, text: "2,1,a,0,0,m1,0" }, Delimiter::default()).unwrap();
    /// assert!(analyzer.push(first).unwrap().is_none());
    /// assert_eq!(1., analyzer.push(second).unwrap().unwrap().step);
    /// assert_eq!(2., analyzer.finish().unwrap().unwrap().step);
    /// ```
    pub fn push(&mut self, mut record: Record) -> Result<Option<StepStats>> {
        let dropped = match self.macs {
            Some(ref macs) => resolve_neighbors(macs, self.config.lenient, &mut record)?,
            None => 0,
        };
        self.unknown_macs += dropped;
        let closed = match self.current.take() {
            Some(current) if current.step() == record.step => {
                self.current = Some(current);
                None
            }
            previous => {
                self.current = Some(Step::new(record.step, record.time));
                previous
            }
        };
        if let Some(ref mut current) = self.current {
            current.push(record);
            current.add_unresolved(dropped);
        }
        closed.map(|step| self.measure(&step)).transpose()
    }

    /// Closes the last step, returning its statistics.
    pub fn finish(&mut self) -> Result<Option<StepStats>> {
        self.current.take().map(|step| self.measure(&step)).transpose()
    }

    /// Returns the number of neighbors dropped because of an unknown MAC address.
    pub fn unknown_macs(&self) -> usize {
        self.unknown_macs
    }

    fn measure(&self, step: &Step) -> Result<StepStats> {
        let stats = step.stats(self.config.lenient)?;
        debug!("step {}: {} vehicles, {} edges", stats.step, stats.vehicles, stats.edges);
        Ok(stats)
    }
}

fn resolve_neighbors(macs: &MacMap, lenient: bool, record: &mut Record) -> Result<usize> {
    let mut unknown = 0;
    let mut vehicles = Vec::with_capacity(record.neighbors.len());
    for mac in record.neighbors.drain(..) {
        match macs.resolve(&mac) {
            Some(vehicle) => vehicles.push(vehicle.to_string()),
            None if lenient => {
                warn!("line {}: no vehicle uses MAC address {}, skipping", record.line, mac);
                unknown += 1;
            }
            None => {
                return Err(Error::UnknownMac {
                               line: record.line,
                               mac,
                           })
            }
        }
    }
    record.neighbors = vehicles;
    Ok(unknown)
}

/// Analyses every line of a source, handing each step's statistics to `on_step` in log order.
///
/// Blank lines are ignored.
pub fn analyse<R, F>(source: &mut R,
                     config: Config,
                     macs: Option<MacMap>,
                     mut on_step: F)
                     -> Result<Summary>
    where R: Read,
          F: FnMut(StepStats) -> Result<()>
{
    let mut summary = Summary {
        macs: macs.as_ref().map_or(0, MacMap::len),
        ..Summary::default()
    };
    let mut analyzer = Analyzer::new(config, macs);
    let mut vehicles = HashSet::new();
    while let Some(line) = source.read() {
        let record = match line {
            Ok(ref line) if line.text.trim().is_empty() => continue,
            Ok(line) => Record::new(&line, config.delimiter),
            Err(err) => Err(err),
        };
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                if config.lenient && err.is_parse_error() {
                    warn!("{}, skipping", err);
                    summary.skipped += 1;
                    continue;
                }
                return Err(err);
            }
        };
        summary.records += 1;
        if !vehicles.contains(&record.vehicle) {
            vehicles.insert(record.vehicle.clone());
        }
        if let Some(stats) = analyzer.push(record)? {
            summary.steps += 1;
            on_step(stats)?;
        }
    }
    if let Some(stats) = analyzer.finish()? {
        summary.steps += 1;
        on_step(stats)?;
    }
    summary.vehicles = vehicles.len();
    summary.unknown_macs = analyzer.unknown_macs();
    Ok(summary)
}

/// Analyses a log file.
///
/// If `config.from_ns3` is set, the file is read twice: once to learn every vehicle's MAC
/// address, then again to analyse it.
///
/// # Examples
///
/// ```
/// # use vanet::{analyse_path, Config};
/// let mut steps = Vec::new();
/// let summary = analyse_path("data/steps.csv", Config::default(), |stats| {
///     steps.push(stats);
///     Ok(())
/// }).unwrap();
/// assert_eq!(3, summary.steps);
/// assert_eq!(3, steps.len());
/// ```
pub fn analyse_path<P, F>(path: P, config: Config, on_step: F) -> Result<Summary>
    where P: AsRef<Path>,
          F: FnMut(StepStats) -> Result<()>
{
    let path = path.as_ref();
    let macs = if config.from_ns3 {
        info!("Collecting MAC addresses from {}", path.display());
        let macs = MacMap::from_source(&mut LogFile::open(path)?, config.delimiter)?;
        if macs.is_empty() {
            warn!("{} has no MAC addresses, every neighbor will be unknown", path.display());
        }
        Some(macs)
    } else {
        None
    };
    info!("Analysing {}", path.display());
    let summary = analyse(&mut LogFile::open(path)?, config, macs, on_step)?;
    info!("Done, {} records in {} steps", summary.records, summary.steps);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(path: &str, config: Config) -> Result<(Summary, Vec<StepStats>)> {
        let mut steps = Vec::new();
        let summary = analyse_path(path, config, |stats| {
            steps.push(stats);
            Ok(())
        })?;
        Ok((summary, steps))
    }

    #[test]
    fn steps() {
        let (summary, steps) = collect("data/steps.csv", Config::default()).unwrap();
        assert_eq!(Summary {
                       records: 6,
                       skipped: 0,
                       steps: 3,
                       vehicles: 3,
                       macs: 0,
                       unknown_macs: 0,
                   },
                   summary);
        assert_eq!(vec![1., 2., 3.], steps.iter().map(|s| s.step).collect::<Vec<_>>());

        let first = steps[0].distances.unwrap();
        assert_eq!(3, steps[0].vehicles);
        assert_eq!(3, steps[0].edges);
        assert_eq!(3, first.connections);
        assert!((14. / 3. - first.average).abs() < 1e-12);
        assert_eq!(5., first.max);

        let second = steps[1].distances.unwrap();
        assert_eq!(2, second.connections);
        assert_eq!(10., second.average);
        assert_eq!(10., second.max);

        assert_eq!(1, steps[2].vehicles);
        assert!(steps[2].distances.is_none());
    }

    #[test]
    fn ns3_resolves_macs() {
        let config = Config {
            from_ns3: true,
            ..Config::default()
        };
        let (summary, ns3) = collect("data/ns3.csv", config).unwrap();
        let (_, plain) = collect("data/steps.csv", Config::default()).unwrap();
        assert_eq!(3, summary.macs);
        assert_eq!(2, ns3.len());
        assert_eq!(&plain[..2], &ns3[..]);
    }

    #[test]
    fn ns3_without_resolution() {
        match collect("data/ns3.csv", Config::default()) {
            Err(Error::UnknownNeighbor { ref neighbor, .. }) => {
                assert_eq!("00:00:00:00:00:02", neighbor)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unknown_mac() {
        let mut macs = MacMap::new();
        macs.insert("m1", "a");
        let config = Config {
            from_ns3: true,
            ..Config::default()
        };
        let text = "1,0,a,0,0,m1,1,m2\n";
        let result = analyse(&mut LogFile::new(text.as_bytes()),
                             config,
                             Some(macs.clone()),
                             |_| Ok(()));
        match result {
            Err(Error::UnknownMac { line: 1, ref mac }) => assert_eq!("m2", mac),
            other => panic!("unexpected result: {:?}", other),
        }

        let config = Config {
            lenient: true,
            ..config
        };
        let summary = analyse(&mut LogFile::new(text.as_bytes()), config, Some(macs), |_| Ok(()))
            .unwrap();
        assert_eq!(1, summary.unknown_macs);
    }

    #[test]
    fn malformed_strict() {
        match collect("data/malformed.csv", Config::default()) {
            Err(Error::InvalidField { line: 3, field: "y", .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn malformed_lenient() {
        let config = Config {
            lenient: true,
            ..Config::default()
        };
        let (summary, steps) = collect("data/malformed.csv", config).unwrap();
        assert_eq!(1, summary.skipped);
        assert_eq!(4, summary.records);
        assert_eq!(2, steps.len());
        assert_eq!(3, steps[0].edges);
        assert_eq!(1, steps[0].unresolved);
        let first = steps[0].distances.unwrap();
        assert_eq!(2, first.connections);
        assert_eq!(5., first.max);
        assert_eq!(10., steps[1].distances.unwrap().max);
    }

    #[test]
    fn callback_errors_stop_the_scan() {
        let mut calls = 0;
        let result = analyse_path("data/steps.csv", Config::default(), |_| {
            calls += 1;
            Err(Error::InvalidDelimiter("stop".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(1, calls);
    }

    #[test]
    fn empty_source() {
        let summary = analyse(&mut LogFile::new("\n\n".as_bytes()),
                              Config::default(),
                              None,
                              |_| Ok(()))
            .unwrap();
        assert_eq!(Summary::default(), summary);
    }

    #[test]
    fn unknown_macs_stay_declared() {
        let text = "1,0,a,0,0,m1,2,m2,ghost\n1,0,b,3,4,m2,0\n1,0,c,0,1,m3,1,ghost\n";
        let mut macs = MacMap::new();
        macs.insert("m1", "a");
        macs.insert("m2", "b");
        macs.insert("m3", "c");
        let config = Config {
            from_ns3: true,
            lenient: true,
            ..Config::default()
        };
        let mut steps = Vec::new();
        let summary = analyse(&mut LogFile::new(text.as_bytes()), config, Some(macs), |stats| {
                steps.push(stats);
                Ok(())
            })
            .unwrap();
        assert_eq!(2, summary.unknown_macs);
        assert_eq!(1, steps.len());
        assert_eq!(3, steps[0].edges);
        assert_eq!(2, steps[0].unresolved);
        let distances = steps[0].distances.unwrap();
        assert_eq!(1, distances.connections);
        assert_eq!(5., distances.max);
    }

    #[test]
    fn invalid_utf8_lenient() {
        let text = &b"1,0,a,0,0,m1,0\n1,0,\xff\xfe,1,1,m2,0\n2,0,a,0,0,m1,0\n"[..];
        let config = Config {
            lenient: true,
            ..Config::default()
        };
        let mut steps = Vec::new();
        let summary = analyse(&mut LogFile::new(text), config, None, |stats| {
                steps.push(stats);
                Ok(())
            })
            .unwrap();
        assert_eq!(1, summary.skipped);
        assert_eq!(2, summary.records);
        assert_eq!(vec![1., 2.], steps.iter().map(|s| s.step).collect::<Vec<_>>());
        assert_eq!(1, steps[0].vehicles);

        match analyse(&mut LogFile::new(text), Config::default(), None, |_| Ok(())) {
            Err(Error::InvalidUtf8 { line: 2 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn returning_step_value_opens_a_new_step() {
        let text = "1,0,a,0,0,m1,0\n2,1,a,0,0,m1,0\n1,2,a,0,0,m1,0\n1,2,b,0,0,m2,0\n";
        let mut steps = Vec::new();
        let summary = analyse(&mut LogFile::new(text.as_bytes()),
                              Config::default(),
                              None,
                              |stats| {
                                  steps.push(stats);
                                  Ok(())
                              })
            .unwrap();
        assert_eq!(3, summary.steps);
        assert_eq!(vec![1., 2., 1.], steps.iter().map(|s| s.step).collect::<Vec<_>>());
        assert_eq!(vec![1, 1, 2], steps.iter().map(|s| s.vehicles).collect::<Vec<_>>());
    }
}
