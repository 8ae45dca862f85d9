//! Simulation steps and their neighbor distance statistics.

use crate::{Error, Point, Record, Result};
use chrono::Duration;
use log::warn;
use std::collections::HashMap;

/// The vehicles and neighbor lists reported during one simulation step.
#[derive(Clone, Debug)]
pub struct Step {
    step: f64,
    time: Duration,
    points: Vec<Point>,
    positions: HashMap<String, usize>,
    edges: Vec<(String, Vec<String>)>,
    edge_slots: HashMap<String, usize>,
    declared_edges: usize,
    dropped: usize,
}

/// Aggregate statistics for one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepStats {
    /// The simulation step.
    pub step: f64,
    /// The simulation time of the step's first record.
    pub time: Duration,
    /// The number of vehicle records in the step.
    pub vehicles: usize,
    /// The number of neighbors declared by those records.
    pub edges: usize,
    /// Neighbors skipped because they had no position in the step, or could not be resolved.
    pub unresolved: usize,
    /// Distance statistics, or `None` if the step has no connections.
    pub distances: Option<DistanceStats>,
}

/// Summary of the distances between connected vehicles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceStats {
    /// The number of measured connections.
    pub connections: usize,
    /// The mean connection distance.
    pub average: f64,
    /// The longest connection distance.
    pub max: f64,
}

impl Step {
    /// Creates an empty step.
    pub fn new(step: f64, time: Duration) -> Step {
        Step {
            step,
            time,
            points: Vec::new(),
            positions: HashMap::new(),
            edges: Vec::new(),
            edge_slots: HashMap::new(),
            declared_edges: 0,
            dropped: 0,
        }
    }

    /// Returns this step's value.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Adds a vehicle record to this step.
    ///
    /// A vehicle keeps the position of its first record in the step, but its neighbor list is
    /// replaced by every later record. The declared edge count comes from the record's
    /// `edge_count`, whatever is left in its neighbor list.
    pub fn push(&mut self, record: Record) {
        let index = self.points.len();
        self.points.push(record.position);
        self.positions.entry(record.vehicle.clone()).or_insert(index);
        self.declared_edges += record.edge_count;
        match self.edge_slots.get(&record.vehicle) {
            Some(&slot) => self.edges[slot].1 = record.neighbors,
            None => {
                self.edge_slots.insert(record.vehicle.clone(), self.edges.len());
                self.edges.push((record.vehicle, record.neighbors));
            }
        }
    }

    /// Returns a vehicle's position in this step.
    pub fn position(&self, vehicle: &str) -> Option<Point> {
        self.positions.get(vehicle).map(|&index| self.points[index])
    }

    /// Counts neighbors that were dropped before their record was pushed.
    pub fn add_unresolved(&mut self, count: usize) {
        self.dropped += count;
    }

    /// Measures every connection in this step.
    ///
    /// A neighbor without a position in this step is an error, unless `lenient` is set, in which
    /// case it is counted as unresolved and skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::{Delimiter, Record, Step};
    /// use vanet::io::Line;
    /// let a = Record::new(&Line { number: 1, text: "1,0,a,0,0,m1,1,b" }, Delimiter::default()).unwrap();
    /// let b = Record::new(&Line { number: 2, text: "1,0,b,3,4,m2,0" }, Delimiter::default()).unwrap();
    /// let mut step = Step::new(a.step, a.time);
    /// step.push(a);
    /// step.push(b);
    /// let stats = step.stats(false).unwrap();
    /// assert_eq!(5., stats.distances.unwrap().max);
    /// ```
    pub fn stats(&self, lenient: bool) -> Result<StepStats> {
        let mut distances = Vec::new();
        let mut unresolved = self.dropped;
        for &(ref vehicle, ref neighbors) in &self.edges {
            let from = match self.position(vehicle) {
                Some(point) => point,
                None => continue,
            };
            for neighbor in neighbors {
                match self.position(neighbor) {
                    Some(to) => distances.push(from.distance(&to)),
                    None if lenient => {
                        warn!("step {}: neighbor {} of vehicle {} has no position, skipping",
                              self.step,
                              neighbor,
                              vehicle);
                        unresolved += 1;
                    }
                    None => {
                        return Err(Error::UnknownNeighbor {
                                       step: self.step,
                                       vehicle: vehicle.clone(),
                                       neighbor: neighbor.clone(),
                                   })
                    }
                }
            }
        }
        Ok(StepStats {
               step: self.step,
               time: self.time,
               vehicles: self.points.len(),
               edges: self.declared_edges,
               unresolved,
               distances: DistanceStats::from_distances(&distances),
           })
    }
}

impl DistanceStats {
    /// Summarizes a set of distances, returning `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::DistanceStats;
    /// let stats = DistanceStats::from_distances(&[5., 5., 4.]).unwrap();
    /// assert_eq!(3, stats.connections);
    /// assert_eq!(5., stats.max);
    /// assert!(DistanceStats::from_distances(&[]).is_none());
    /// ```
    pub fn from_distances(distances: &[f64]) -> Option<DistanceStats> {
        if distances.is_empty() {
            return None;
        }
        let sum: f64 = distances.iter().sum();
        Some(DistanceStats {
                 connections: distances.len(),
                 average: sum / distances.len() as f64,
                 max: distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
             })
    }
}
