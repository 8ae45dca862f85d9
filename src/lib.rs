//! Per-step neighbor distance statistics for vehicular network connectivity logs.

pub mod analysis;
pub mod io;
pub mod mac;
pub mod point;
pub mod record;
pub mod report;
pub mod step;
pub mod timing;

pub use analysis::{analyse, analyse_path, Analyzer, Config, Summary};
pub use mac::MacMap;
pub use point::Point;
pub use record::{Delimiter, Record};
pub use step::{DistanceStats, Step, StepStats};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    MissingFields {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid {field} {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },
    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(String),
    #[error("line {line}: no vehicle uses MAC address {mac}")]
    UnknownMac { line: usize, mac: String },
    #[error("step {step}: vehicle {vehicle} lists neighbor {neighbor}, which has no position in this step")]
    UnknownNeighbor {
        step: f64,
        vehicle: String,
        neighbor: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Returns true if this error comes from a single malformed line.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            *self,
            Error::MissingFields { .. } | Error::InvalidField { .. } | Error::InvalidUtf8 { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
