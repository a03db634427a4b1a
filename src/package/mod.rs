//! Package container codec.
//!
//! An OOXML document is a ZIP archive of XML parts. This module reads a
//! package into an in-memory part map, resolves the main document body
//! part through the package relationships, and serializes a (possibly
//! modified) part map back into a valid archive.

mod codec;
mod metadata;
mod relationships;

pub use codec::Package;
pub use metadata::PackageMetadata;
pub use relationships::{
    parse_relationships, part_relationships, rels_part_name, resolve_target, Relationship,
};
