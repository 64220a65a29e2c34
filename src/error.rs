// error.rs - 错误类型

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Where in an input a problem was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// File name or stream label; empty when parsing a detached line.
    pub source: String,
    /// 1-based line (or record) number; 0 when unknown.
    pub line: usize,
}

impl Location {
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Location { source: source.into(), line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source.is_empty(), self.line) {
            (true, 0) => write!(f, "<input>"),
            (true, line) => write!(f, "line {line}"),
            (false, 0) => write!(f, "{}", self.source),
            (false, line) => write!(f, "{}:{}", self.source, line),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input row, line or record.
    #[error("format error at {location}: {msg}")]
    Format { location: Location, msg: String },

    /// Header template that cannot be rendered.
    #[error("invalid id template {template:?}: {msg}")]
    InvalidTemplate { template: String, msg: String },

    /// Barcode preprocessing rule that cannot be parsed.
    #[error("invalid barcode transform: {0}")]
    InvalidTransform(String),

    /// The synchronized read streams disagree on length.
    #[error(
        "read streams have different lengths: {exhausted} ended after {record} records \
         while {remaining} still had data"
    )]
    StreamLengthMismatch {
        record: u64,
        exhausted: String,
        remaining: String,
    },

    /// FASTQ output requested for a record without quality data.
    #[error("record {id:?} has no quality string; cannot write FASTQ")]
    MissingQuality { id: String },

    #[error("I/O error on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),
}

// csv 底层的 I/O 错误归到 Io
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Error::Csv(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            kind => Error::Csv(format!("{kind:?}")),
        }
    }
}

impl Error {
    pub fn format(location: Location, msg: impl Into<String>) -> Self {
        Error::Format { location, msg: msg.into() }
    }

    /// Attach a location to a `Format` error raised without one.
    pub fn located(self, source: &str, line: usize) -> Self {
        match self {
            Error::Format { location, msg } if location == Location::default() => Error::Format {
                location: Location::new(source, line),
                msg,
            },
            other => other,
        }
    }

    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileIo { path: path.into(), source }
    }
}
