//! # docsplit
//!
//! Splitting library for composite OOXML documents.
//!
//! A composite document holds N logical sub-documents concatenated in a
//! single body. This library locates the boundaries between them,
//! partitions the body without corrupting cross-references, and
//! repackages each partition into a valid standalone container named
//! from a row-indexed naming table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsplit::{split_file, NamingTable};
//!
//! fn main() -> docsplit::Result<()> {
//!     let table = NamingTable::from_pairs([
//!         ("Acme Corp", "2024-001"),
//!         ("Borealis Ltd", "2024-002"),
//!     ]);
//!
//!     // One output document per naming row
//!     let outcome = split_file("composite.docx", &table)?;
//!     for document in &outcome.documents {
//!         std::fs::write(&document.file_name, &document.bytes)?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three split policies**: fixed count, keyword marker, explicit
//!   per-part counts
//! - **Structural fidelity**: node payloads are copied byte-for-byte,
//!   never reinterpreted; all package resources travel with every output
//! - **Partial success**: per-index failures are reported, not fatal
//! - **Parallel encoding**: outputs are produced concurrently with Rayon

pub mod assemble;
pub mod bundle;
pub mod detect;
pub mod error;
pub mod model;
pub mod naming;
pub mod package;
pub mod partition;
pub mod split;

// Re-export commonly used types
pub use assemble::{
    split_package, NamedDocument, Overflow, SkippedPart, SplitOptions, SplitOutcome, SplitSummary,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ContainerFormat};
pub use error::{Error, Result};
pub use model::{BlockNode, DocumentBody, NodeKind};
pub use naming::{NamePair, NamingTable};
pub use package::{Package, PackageMetadata};
pub use split::{SplitPlan, SplitPolicy};

use std::io::Read;
use std::path::Path;

/// Split a composite document file with default options (fixed count,
/// one part per naming row).
///
/// # Example
///
/// ```no_run
/// use docsplit::{split_file, NamingTable};
///
/// let table = NamingTable::from_pairs([("A", "1"), ("B", "2")]);
/// let outcome = split_file("composite.docx", &table).unwrap();
/// println!("{} documents produced", outcome.summary.succeeded);
/// ```
pub fn split_file<P: AsRef<Path>>(path: P, table: &NamingTable) -> Result<SplitOutcome> {
    split_file_with_options(path, table, &SplitOptions::default())
}

/// Split a composite document file with custom options.
///
/// # Example
///
/// ```no_run
/// use docsplit::{split_file_with_options, NamingTable, SplitOptions};
///
/// let table = NamingTable::from_pairs([("A", "1")]);
/// let options = SplitOptions::new().with_marker("POWER OF ATTORNEY");
/// let outcome = split_file_with_options("composite.docx", &table, &options).unwrap();
/// ```
pub fn split_file_with_options<P: AsRef<Path>>(
    path: P,
    table: &NamingTable,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let package = Package::from_path(path)?;
    split_package(&package, table, options)
}

/// Split a composite document from bytes.
pub fn split_bytes(data: &[u8], table: &NamingTable) -> Result<SplitOutcome> {
    split_bytes_with_options(data, table, &SplitOptions::default())
}

/// Split a composite document from bytes with custom options.
pub fn split_bytes_with_options(
    data: &[u8],
    table: &NamingTable,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let package = Package::from_bytes(data)?;
    split_package(&package, table, options)
}

/// Split a composite document from a reader.
pub fn split_reader<R: Read>(mut reader: R, table: &NamingTable) -> Result<SplitOutcome> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    split_bytes(&data, table)
}

/// Builder for configuring and running a split.
///
/// # Example
///
/// ```no_run
/// use docsplit::{NamingTable, Splitter};
///
/// let table = NamingTable::from_pairs([("A", "1"), ("B", "2")]);
/// let outcome = Splitter::new()
///     .with_marker("POWER OF ATTORNEY")
///     .strict_naming()
///     .split_file("composite.docx", &table)?;
/// # Ok::<(), docsplit::Error>(())
/// ```
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    /// Create a new splitter with default options.
    pub fn new() -> Self {
        Self {
            options: SplitOptions::default(),
        }
    }

    /// Set the split policy.
    pub fn with_policy(mut self, policy: SplitPolicy) -> Self {
        self.options = self.options.with_policy(policy);
        self
    }

    /// Use the keyword-marker policy.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.options = self.options.with_marker(marker);
        self
    }

    /// Use the explicit-count policy.
    pub fn with_counts(mut self, counts: impl Into<Vec<usize>>) -> Self {
        self.options = self.options.with_counts(counts);
        self
    }

    /// Fail the run when the plan outgrows the naming table.
    pub fn strict_naming(mut self) -> Self {
        self.options = self.options.strict_naming();
        self
    }

    /// Disable parallel encoding.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Split a file.
    pub fn split_file<P: AsRef<Path>>(self, path: P, table: &NamingTable) -> Result<SplitOutcome> {
        split_file_with_options(path, table, &self.options)
    }

    /// Split from bytes.
    pub fn split_bytes(self, data: &[u8], table: &NamingTable) -> Result<SplitOutcome> {
        split_bytes_with_options(data, table, &self.options)
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}
