//! Error types for `flight-rtree`.
//!
//! A search that finds nothing is not an error, it returns an empty result.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors reported by the index and its loader.
#[derive(Error, Debug)]
pub enum Error {
    /// The input source could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the input source is malformed.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number, the header being line 1
        line: usize,
        /// What is wrong with the line
        reason: String,
    },

    /// A record with a non-finite coordinate or a negative span.
    #[error("invalid interval for flight {id:?}: start {start}, span {span}")]
    InvalidInterval {
        /// Flight identifier
        id: String,
        /// Start coordinate
        start: f64,
        /// Time in the air
        span: f64,
    },

    /// The configuration cannot build a tree.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
