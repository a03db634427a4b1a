//! Error types for the docsplit library.

use std::io;
use thiserror::Error;

/// Result type alias for docsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while splitting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a valid package archive, or it lacks the
    /// mandatory main document part.
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    /// The main document body is missing its root element or is not
    /// well-formed XML.
    #[error("Malformed document body: {0}")]
    MalformedBody(String),

    /// The document body has no content nodes to split.
    #[error("Document body is empty")]
    EmptyInput,

    /// The split policy produced zero output ranges (e.g. no marker
    /// matched any node).
    #[error("Split policy produced no parts")]
    InsufficientParts,

    /// A split range is out of bounds, or empty where the policy
    /// requires non-empty parts.
    #[error("Partition {index}: range {start}..{end} is invalid for {node_count} nodes")]
    PartitionRangeInvalid {
        /// 0-based partition index.
        index: usize,
        /// Range start (inclusive).
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Total node count in the source body.
        node_count: usize,
    },

    /// The naming table has no row for a partition index.
    #[error("Partition {index} has no naming row (table has {rows} rows)")]
    NamingTableExhausted {
        /// 0-based partition index.
        index: usize,
        /// Number of rows in the naming table.
        rows: usize,
    },

    /// Explicit per-part counts do not cover the node sequence exactly.
    #[error("Explicit counts cover {supplied} nodes but the body has {expected}")]
    CountCoverageMismatch {
        /// Node count of the source body.
        expected: usize,
        /// Sum of the supplied per-part counts.
        supplied: usize,
    },

    /// Error serializing a package back into an archive.
    #[error("Container write error: {0}")]
    ContainerWrite(String),
}

impl Error {
    /// Whether the error is confined to a single partition index.
    ///
    /// Recoverable errors are recorded per index and the run continues;
    /// everything else aborts the run before any output is produced.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PartitionRangeInvalid { .. } | Error::NamingTableExhausted { .. }
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedBody(err.to_string())
    }
}
