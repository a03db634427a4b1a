//! Naming-table ingestion from CSV files.

use std::path::Path;

use docsplit::{NamePair, NamingTable};

/// Load a naming table from a CSV file.
///
/// The first two columns become the primary and secondary labels, in
/// row order; extra columns are ignored. With `has_headers` the first
/// row is treated as a header and skipped.
pub fn load_naming_table(
    path: &Path,
    has_headers: bool,
) -> Result<NamingTable, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let primary = record.get(0);
        let secondary = record.get(1);

        match (primary, secondary) {
            (Some(primary), Some(secondary)) => {
                rows.push(NamePair::new(primary, secondary));
            }
            _ => {
                return Err(format!(
                    "row {}: the naming table needs at least two columns",
                    line + 1
                )
                .into());
            }
        }
    }

    Ok(NamingTable::new(rows))
}
