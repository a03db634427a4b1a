//! Pipeline assembly: load, locate, partition, name, encode.

use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::DocumentBody;
use crate::naming::NamingTable;
use crate::package::Package;
use crate::partition;
use crate::split::{self, SplitPolicy};

/// What to do when the split plan has more parts than naming rows.
///
/// The choice is always explicit configuration; the run never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Process `min(parts, rows)` documents and report the overflow
    /// indices as skipped.
    #[default]
    Truncate,

    /// Fail the whole run before producing any output.
    Strict,
}

/// Options for a split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Boundary policy
    pub policy: SplitPolicy,

    /// Naming-table overflow handling
    pub overflow: Overflow,

    /// Whether to encode partitions in parallel
    pub parallel: bool,
}

impl SplitOptions {
    /// Create new split options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the split policy.
    pub fn with_policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use the keyword-marker policy.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.policy = SplitPolicy::marker(marker.into());
        self
    }

    /// Use the explicit-count policy.
    pub fn with_counts(mut self, counts: impl Into<Vec<usize>>) -> Self {
        self.policy = SplitPolicy::explicit_counts(counts);
        self
    }

    /// Fail the run when the plan outgrows the naming table.
    pub fn strict_naming(mut self) -> Self {
        self.overflow = Overflow::Strict;
        self
    }

    /// Enable or disable parallel encoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel encoding.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            policy: SplitPolicy::default(),
            overflow: Overflow::default(),
            parallel: true,
        }
    }
}

/// One successfully produced output document.
#[derive(Debug, Clone)]
pub struct NamedDocument {
    /// Output filename, built from the naming table
    pub file_name: String,

    /// Serialized package bytes
    pub bytes: Vec<u8>,
}

/// A partition index the run could not produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedPart {
    /// 0-based partition index
    pub index: usize,

    /// Failure description
    pub reason: String,
}

/// Tally of a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Number of documents produced
    pub succeeded: usize,

    /// Indices skipped, with reasons
    pub skipped: Vec<SkippedPart>,
}

impl SplitSummary {
    /// Total number of partition indices attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.skipped.len()
    }
}

/// Result of a split run: the produced documents plus the summary.
///
/// Partial success is a first-class outcome: the run either aborts
/// early with one fatal error, or completes having attempted every
/// index and reports the skipped ones here.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Produced documents, in partition order
    pub documents: Vec<NamedDocument>,

    /// Per-run tally
    pub summary: SplitSummary,
}

/// Run the full pipeline over an opened package.
///
/// Fatal errors (`CorruptContainer`, `MalformedBody`, `EmptyInput`,
/// `InsufficientParts`, `CountCoverageMismatch`) abort with no partial
/// output; per-index errors are recorded in the summary and the run
/// continues with the next index.
pub fn split_package(
    source: &Package,
    table: &NamingTable,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let body = DocumentBody::parse(source.body_bytes())?;
    let plan = split::locate(&body, &options.policy, table.len())?;

    if options.overflow == Overflow::Strict && plan.part_count() > table.len() {
        return Err(Error::NamingTableExhausted {
            index: table.len(),
            rows: table.len(),
        });
    }

    partition::verify_references(source, &body)?;

    log::debug!(
        "splitting into {} part(s) ({} naming rows, {})",
        plan.part_count(),
        table.len(),
        options.policy
    );

    // Indices share only the read-only source; each writes its own
    // output, so the encode loop maps over a worker pool unlocked.
    let jobs: Vec<(usize, Range<usize>)> = plan.iter().enumerate().collect();
    let encode_one = |(index, range): (usize, Range<usize>)| {
        let result = partition::partition(source, &body, index, range)
            .and_then(|output| {
                let file_name = table.file_name(index, source.extension())?;
                Ok((file_name, output))
            })
            .and_then(|(file_name, output)| {
                let bytes = output.write_to_bytes()?;
                Ok(NamedDocument { file_name, bytes })
            });
        (index, result)
    };

    let results: Vec<(usize, Result<NamedDocument>)> = if options.parallel {
        jobs.into_par_iter().map(encode_one).collect()
    } else {
        jobs.into_iter().map(encode_one).collect()
    };

    let mut documents = Vec::new();
    let mut summary = SplitSummary::default();
    for (index, result) in results {
        match result {
            Ok(document) => {
                summary.succeeded += 1;
                documents.push(document);
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("skipping partition {index}: {err}");
                summary.skipped.push(SkippedPart {
                    index,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(SplitOutcome { documents, summary })
}
