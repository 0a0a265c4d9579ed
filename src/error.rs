//! Error types for tokenizing, parsing, acquiring input and table operations.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// A line could not be split into tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated {quote} quote starting at column {column}")]
    UnterminatedQuote { quote: char, column: usize },

    #[error("dangling escape at end of line")]
    DanglingEscape,

    #[error("invalid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

/// A token was rejected by a scalar parser.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no digits in {0:?}")]
    NoDigits(String),

    #[error("unexpected character {ch:?} at position {position}")]
    InvalidChar { ch: char, position: usize },

    #[error("{0:?} is out of range")]
    OutOfRange(String),

    #[error("{0:?} is not a boolean")]
    InvalidBool(String),

    #[error("length {len} exceeds maximum of {max}")]
    TooLong { len: usize, max: usize },

    #[error("character {0:?} is not allowed")]
    NotAllowed(char),

    #[error("unrecognized option {0:?}")]
    Unrecognized(String),
}

/// Failure to acquire one validated value from the input stream.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input stream is exhausted.
    #[error("end of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed line; fatal when no retry budget is available.
    #[error("malformed line: {0}")]
    Tokenize(#[from] TokenizeError),

    /// Malformed token; fatal when no retry budget is available.
    #[error("malformed value: {0}")]
    Malformed(#[from] ParseError),

    /// The retry budget ran out.
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

/// Errors from the row store, search and sort engines.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table capacity must be greater than zero")]
    ZeroCapacity,

    #[error("capacity {0} cannot be rounded to a power of two")]
    CapacityOverflow(usize),

    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("position {position} is out of bounds for a table of {len} rows")]
    OutOfBounds { position: usize, len: usize },

    #[error("table is empty")]
    Empty,

    #[error("no row id left to assign")]
    IdExhausted,

    #[error("invalid search: {0}")]
    InvalidSpec(String),
}

impl TableError {
    pub(crate) fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec(reason.into())
    }
}

/// Errors raised while reconstructing a table from its text dump.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("bad header: {0}")]
    Header(#[source] InputError),

    #[error("bad row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: InputError,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors surfaced by a single session command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors reading or writing a session configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
