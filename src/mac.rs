//! Resolve neighbor MAC addresses into vehicle identifiers.
//!
//! NS-3 logs list each vehicle's neighbors by MAC address. A pre-pass over the log collects
//! every vehicle's MAC so that neighbors can be looked up by vehicle instead.

use crate::io::Read;
use crate::record::{Delimiter, MAC, VEHICLE};
use crate::Result;
use log::{debug, info};
use std::collections::HashMap;

/// A map from MAC address to vehicle identifier.
#[derive(Clone, Debug, Default)]
pub struct MacMap {
    vehicles: HashMap<String, String>,
}

impl MacMap {
    /// Creates an empty map.
    pub fn new() -> MacMap {
        MacMap::default()
    }

    /// Builds a map from every line of a source.
    ///
    /// Lines too short to carry a MAC address, or that are not valid UTF-8, are ignored. If a MAC
    /// shows up for more than one vehicle, the last one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::{Delimiter, MacMap};
    /// use vanet::io::LogFile;
    /// let mut log = LogFile::open("data/ns3.csv").unwrap();
    /// let macs = MacMap::from_source(&mut log, Delimiter::default()).unwrap();
    /// assert_eq!(Some("b"), macs.resolve("00:00:00:00:00:02"));
    /// ```
    pub fn from_source<R: Read>(source: &mut R, delimiter: Delimiter) -> Result<MacMap> {
        let mut macs = MacMap::new();
        let mut lines = 0;
        while let Some(line) = source.read() {
            let line = match line {
                Ok(line) => line,
                Err(ref err) if err.is_parse_error() => {
                    debug!("{}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            lines += 1;
            let fields = delimiter.split(line.text);
            if fields.len() > MAC {
                macs.insert(fields[MAC], fields[VEHICLE]);
            } else {
                debug!("line {}: no MAC address", line.number);
            }
        }
        info!("Resolved {} MAC addresses from {} lines", macs.len(), lines);
        Ok(macs)
    }

    /// Maps a MAC address to a vehicle, returning the vehicle it used to map to.
    pub fn insert(&mut self, mac: &str, vehicle: &str) -> Option<String> {
        self.vehicles.insert(mac.to_string(), vehicle.to_string())
    }

    /// Returns the vehicle using a MAC address.
    pub fn resolve(&self, mac: &str) -> Option<&str> {
        self.vehicles.get(mac).map(String::as_str)
    }

    /// Returns the number of known MAC addresses.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns true if no MAC addresses are known.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
