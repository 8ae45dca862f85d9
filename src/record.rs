//! Connectivity log records.
//!
//! Each line of a log describes one vehicle at one simulation step:
//!
//! ```text
//! step,time,vehicle,x,y,mac,n,neighbor_1,...,neighbor_n
//! 1,21631,21,23094,21968.5,00:00:00:00:00:16,2,00:00:00:00:00:20,00:00:00:00:01:f7
//! ```
//!
//! Neighbors are vehicle identifiers, or MAC addresses for logs written by NS-3.

use crate::io::Line;
use crate::{timing, Error, Point, Result};
use chrono::Duration;
use std::str::FromStr;

const STEP: usize = 0;
const TIME: usize = 1;
/// Index of the vehicle identifier.
pub const VEHICLE: usize = 2;
const X: usize = 3;
const Y: usize = 4;
/// Index of the vehicle's MAC address.
pub const MAC: usize = 5;
const EDGE_COUNT: usize = 6;
/// Number of fields preceding the neighbor list.
pub const FIXED_FIELDS: usize = 7;

/// How fields are separated on a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delimiter {
    /// A single separator character.
    Char(char),
    /// One or more whitespace characters.
    Whitespace,
}

/// One vehicle's state at one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The line this record was read from.
    pub line: usize,
    /// The simulation step.
    pub step: f64,
    /// The simulation time.
    pub time: Duration,
    /// The vehicle identifier.
    pub vehicle: String,
    /// The vehicle's position.
    pub position: Point,
    /// The vehicle's MAC address.
    pub mac: String,
    /// The number of neighbors the line declares.
    pub edge_count: usize,
    /// The vehicle's neighbors, as listed in the log.
    pub neighbors: Vec<String>,
}

impl Default for Delimiter {
    fn default() -> Delimiter {
        Delimiter::Char(',')
    }
}

impl FromStr for Delimiter {
    type Err = Error;

    /// Parses a delimiter.
    ///
    /// `ws` and `whitespace` select whitespace, `tab` and `\t` a tab, and any other single
    /// character is used as is.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::Delimiter;
    /// assert_eq!(Delimiter::Char(';'), ";".parse().unwrap());
    /// assert_eq!(Delimiter::Whitespace, "ws".parse().unwrap());
    /// ```
    fn from_str(s: &str) -> Result<Delimiter> {
        match s {
            "ws" | "whitespace" => Ok(Delimiter::Whitespace),
            "tab" | "\\t" => Ok(Delimiter::Char('\t')),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Delimiter::Char(c)),
                    _ => Err(Error::InvalidDelimiter(s.to_string())),
                }
            }
        }
    }
}

impl Delimiter {
    /// Splits a line into trimmed fields.
    pub fn split(self, text: &str) -> Vec<&str> {
        match self {
            Delimiter::Char(c) => text.split(c).map(str::trim).collect(),
            Delimiter::Whitespace => text.split_whitespace().collect(),
        }
    }
}

impl Record {
    /// Parses a record from a log line.
    ///
    /// Fields after the declared neighbors are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::{Delimiter, Record};
    /// use vanet::io::Line;
    /// let line = Line { number: 1, text: "1,21631,a,0,0,00:00:00:00:00:01,1,b" };
    /// let record = Record::new(&line, Delimiter::default()).unwrap();
    /// assert_eq!(vec!["b".to_string()], record.neighbors);
    /// ```
    pub fn new(line: &Line, delimiter: Delimiter) -> Result<Record> {
        let fields = delimiter.split(line.text);
        if fields.len() < FIXED_FIELDS {
            return Err(Error::MissingFields {
                line: line.number,
                expected: FIXED_FIELDS,
                found: fields.len(),
            });
        }
        let edge_count: usize = parse(line.number, "edge count", fields[EDGE_COUNT])?;
        let expected = FIXED_FIELDS.saturating_add(edge_count);
        if fields.len() < expected {
            return Err(Error::MissingFields {
                line: line.number,
                expected,
                found: fields.len(),
            });
        }
        let time = timing::sim_time(finite(line.number, "time", fields[TIME])?)
            .ok_or_else(|| invalid(line.number, "time", fields[TIME]))?;
        Ok(Record {
            line: line.number,
            step: finite(line.number, "step", fields[STEP])?,
            time,
            vehicle: fields[VEHICLE].to_string(),
            position: Point::new(finite(line.number, "x", fields[X])?,
                                 finite(line.number, "y", fields[Y])?),
            mac: fields[MAC].to_string(),
            edge_count,
            neighbors: fields[FIXED_FIELDS..expected]
                .iter()
                .map(|neighbor| neighbor.to_string())
                .collect(),
        })
    }
}

fn parse<T: FromStr>(line: usize, field: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|_| invalid(line, field, value))
}

fn finite(line: usize, field: &'static str, value: &str) -> Result<f64> {
    let n: f64 = parse(line, field, value)?;
    if n.is_finite() {
        Ok(n)
    } else {
        Err(invalid(line, field, value))
    }
}

fn invalid(line: usize, field: &'static str, value: &str) -> Error {
    Error::InvalidField {
        line,
        field,
        value: value.to_string(),
    }
}
