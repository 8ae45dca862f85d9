//! Read connectivity log lines from sources.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A numbered line of a connectivity log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line<'a> {
    /// The 1-based line number.
    pub number: usize,
    /// The line's text, without the line terminator.
    pub text: &'a str,
}

/// A trait for things that can produce connectivity log lines.
pub trait Read {
    /// Get the next line of the log.
    ///
    /// # Examples
    ///
    /// `LogFile` implements `Read`:
    ///
    /// ```
    /// use vanet::io::{LogFile, Read};
    /// let mut log = LogFile::open("data/steps.csv").unwrap();
    /// let line = log.read().unwrap().unwrap();
    /// assert_eq!(1, line.number);
    /// ```
    fn read(&mut self) -> Option<Result<Line<'_>>>;
}

/// Reads connectivity log lines from any buffered reader.
#[derive(Debug)]
pub struct LogFile<R> {
    reader: R,
    buffer: Vec<u8>,
    number: usize,
}

impl LogFile<BufReader<File>> {
    /// Opens a log file for reading.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::io::LogFile;
    /// let log = LogFile::open("data/steps.csv").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<LogFile<BufReader<File>>> {
        Ok(LogFile::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> LogFile<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> LogFile<R> {
        LogFile {
            reader,
            buffer: Vec::new(),
            number: 0,
        }
    }
}

impl<R: BufRead> Read for LogFile<R> {
    /// Lines that are not valid UTF-8 are returned as `Error::InvalidUtf8`, and reading can
    /// carry on past them.
    fn read(&mut self) -> Option<Result<Line<'_>>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                let mut end = self.buffer.len();
                while end > 0 && (self.buffer[end - 1] == b'\n' || self.buffer[end - 1] == b'\r') {
                    end -= 1;
                }
                match std::str::from_utf8(&self.buffer[..end]) {
                    Ok(text) => Some(Ok(Line {
                        number: self.number,
                        text,
                    })),
                    Err(_) => Some(Err(Error::InvalidUtf8 { line: self.number })),
                }
            }
            Err(err) => Some(Err(err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file() {
        LogFile::open("data/steps.csv").unwrap();
    }

    #[test]
    fn log_invalid_file() {
        assert!(LogFile::open("notafile").is_err());
    }

    #[test]
    fn strips_terminators_and_counts_lines() {
        let mut log = LogFile::new("first\r\n\nthird".as_bytes());
        let line = log.read().unwrap().unwrap();
        assert_eq!(Line { number: 1, text: "first" }, line);
        let line = log.read().unwrap().unwrap();
        assert_eq!(Line { number: 2, text: "" }, line);
        let line = log.read().unwrap().unwrap();
        assert_eq!(Line { number: 3, text: "third" }, line);
        assert!(log.read().is_none());
    }

    #[test]
    fn invalid_utf8_line() {
        let mut log = LogFile::new(&b"first\n\xff\xfe\nthird\n"[..]);
        assert_eq!("first", log.read().unwrap().unwrap().text);
        match log.read() {
            Some(Err(Error::InvalidUtf8 { line: 2 })) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        let line = log.read().unwrap().unwrap();
        assert_eq!(Line { number: 3, text: "third" }, line);
        assert!(log.read().is_none());
    }
}
