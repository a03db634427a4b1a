//! Output naming: row-indexed naming table and filename construction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Filename stem prepended to every output document.
pub const FILE_NAME_PREFIX: &str = "PROCURATION";

/// One naming row: the labels for a single output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePair {
    /// Primary label (e.g. original creditor)
    pub primary: String,

    /// Secondary label (e.g. current case number)
    pub secondary: String,
}

impl NamePair {
    /// Create a name pair.
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Ordered sequence of name pairs, positionally aligned with the split
/// plan: row `i` names partition `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingTable {
    rows: Vec<NamePair>,
}

impl NamingTable {
    /// Build a table from ordered rows.
    pub fn new(rows: Vec<NamePair>) -> Self {
        Self { rows }
    }

    /// Build a table from `(primary, secondary)` string pairs.
    pub fn from_pairs<P, S>(pairs: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            rows: pairs
                .into_iter()
                .map(|(primary, secondary)| NamePair::new(primary, secondary))
                .collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by partition index.
    pub fn row(&self, index: usize) -> Option<&NamePair> {
        self.rows.get(index)
    }

    /// Build the output filename for a partition index.
    ///
    /// Deterministic: the same `(index, table, extension)` always
    /// produces the same name. Labels are trimmed and path separators
    /// are replaced before concatenation.
    ///
    /// Fails with [`Error::NamingTableExhausted`] when the index has no
    /// row.
    pub fn file_name(&self, index: usize, extension: &str) -> Result<String> {
        let row = self.row(index).ok_or(Error::NamingTableExhausted {
            index,
            rows: self.rows.len(),
        })?;

        Ok(format!(
            "{FILE_NAME_PREFIX} - {} - {}.{extension}",
            sanitize_label(&row.primary),
            sanitize_label(&row.secondary)
        ))
    }
}

/// Trim a label and replace path-separator characters with hyphens so
/// it is safe as a filename component.
pub fn sanitize_label(label: &str) -> String {
    label.trim().replace(['/', '\\'], "-")
}
