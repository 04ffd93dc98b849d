//! Error types shared by the whole crate.
//!
//! Two kinds of failure are distinguished:
//!
//! - [`FormatError`]: the bytes of a file do not match the structure of the
//!   format that is being parsed. Always attributable to file content.
//! - [`RunTimeError`]: everything else (file cannot be opened, unknown format
//!   name, format cannot be determined, index out of range, ...).
//!
//! Both are wrapped by [`Error`], which is what public functions return.

use std::io;
use std::path::PathBuf;

use crate::registry::GuessFailure;

/// The content of a file does not match the format being parsed.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Fewer bytes (or lines) were available than the format requires
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A fixed-length string field is longer than the reader accepts
    #[error("string field of {len} bytes exceeds the {limit}-byte limit")]
    StringTooLong {
        /// Requested length
        len: usize,
        /// Largest accepted length
        limit: usize,
    },

    /// A token that should be a number is not one
    #[error("not a number as expected: '{0}'")]
    NotANumber(String),

    /// A numeric token does not fit the target type
    #[error("numeric overflow when reading '{0}'")]
    NumericOverflow(String),

    /// Compressed input could not be inflated
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Structural violation specific to one format
    #[error("unexpected format for filetype {format}: {detail}")]
    Unexpected {
        /// Registry name of the format being parsed
        format: &'static str,
        /// What was wrong
        detail: String,
    },
}

impl FormatError {
    /// Structural violation of `format`.
    pub fn unexpected(format: &'static str, detail: impl Into<String>) -> Self {
        Self::Unexpected {
            format,
            detail: detail.into(),
        }
    }
}

/// Any failure that is not attributable to the content of the parsed file.
#[derive(Debug, thiserror::Error)]
pub enum RunTimeError {
    /// Input file could not be opened
    #[error("can't open input file {path}: {source}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Output file could not be created
    #[error("can't create file {path}: {source}")]
    Create {
        /// Path that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// No registered format has this name
    #[error("unsupported (misspelled?) data format: {0}")]
    UnknownFormat(String),

    /// The format of a file could not be guessed
    #[error("format of {path} not determined: {reason}")]
    NotDetermined {
        /// File whose format was guessed
        path: PathBuf,
        /// Why guessing failed
        reason: GuessFailure,
    },

    /// Block, column, point or registry index out of range
    #[error("{what} index out of range: {index}")]
    IndexOutOfRange {
        /// Kind of thing being indexed
        what: &'static str,
        /// Offending index
        index: usize,
    },

    /// Meta-data key is absent
    #[error("no such key in meta-data: {0}")]
    KeyNotFound(String),

    /// Extremes of an unlimited step column were requested without a point count
    #[error("column has unlimited length, point count must be given")]
    UnboundedColumn,

    /// Extremes of a column without points were requested
    #[error("column has no points")]
    EmptyColumn,

    /// Other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Error returned by every fallible operation of this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File content does not match the format
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Any other failure
    #[error(transparent)]
    RunTime(#[from] RunTimeError),
}

impl Error {
    /// True if the error is attributable to file content.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format(FormatError::UnexpectedEof)
        } else {
            Error::RunTime(RunTimeError::Io(err))
        }
    }
}

/// Result alias using the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
