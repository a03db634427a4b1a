//! Partitioning: one output package per split range.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::model::DocumentBody;
use crate::package::{part_relationships, Package};

/// Build a standalone output package for one split range.
///
/// The range's nodes are deep-copied into a fresh body; every non-body
/// package part (styles, numbering, media, relationships) is cloned
/// unchanged, and only the body part is substituted. Nothing is
/// re-interpreted or re-styled, only relocated.
///
/// Fails with [`Error::PartitionRangeInvalid`] if the range is out of
/// bounds or empty.
pub fn partition(
    source: &Package,
    body: &DocumentBody,
    index: usize,
    range: Range<usize>,
) -> Result<Package> {
    let node_count = body.node_count();
    if range.start >= range.end || range.end > node_count {
        return Err(Error::PartitionRangeInvalid {
            index,
            start: range.start,
            end: range.end,
            node_count,
        });
    }

    let part_body = body.partition_range(range);
    Ok(source.with_body(part_body.serialize()))
}

/// Confirm that every resource reference in the body's nodes resolves
/// through the body part's relationship manifest.
///
/// The partitioner clones all non-body parts wholesale, so this holds
/// for every output whenever it holds for the source; a failure points
/// at a reference the source itself cannot resolve.
pub fn verify_references(package: &Package, body: &DocumentBody) -> Result<Vec<String>> {
    let rels = part_relationships(package, package.body_part())?;
    let mut unresolved = Vec::new();

    for node in body.nodes() {
        for reference in node.resource_refs() {
            if !rels.iter().any(|rel| &rel.id == reference) && !unresolved.contains(reference) {
                unresolved.push(reference.clone());
            }
        }
    }

    if !unresolved.is_empty() {
        log::warn!(
            "{} resource reference(s) do not resolve: {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }

    Ok(unresolved)
}
