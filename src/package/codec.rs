//! In-memory package container: archive open / materialize.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

use super::relationships::{parse_relationships, resolve_target};

/// Relationship type of the main document part.
const REL_TYPE_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Conventional body part path used when the package rels are absent.
const DEFAULT_BODY_PART: &str = "word/document.xml";

/// Content type marker for macro-enabled documents.
const MACRO_CONTENT_TYPE: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";

/// In-memory representation of a document package as a map of
/// part name -> raw bytes.
///
/// The part map is ordered so that [`Package::write_to_bytes`] produces
/// deterministic archives: the same part set with the same bytes always
/// serializes identically.
#[derive(Debug, Clone)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
    body_part: String,
    extension: String,
}

impl Package {
    /// Open a package from raw archive bytes.
    ///
    /// Fails with [`Error::CorruptContainer`] if the bytes are not a
    /// readable ZIP archive or the package lacks a main document part.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = Cursor::new(bytes);
        let mut zip = zip::ZipArchive::new(reader)
            .map_err(|e| Error::CorruptContainer(e.to_string()))?;

        let mut parts = BTreeMap::new();
        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| Error::CorruptContainer(e.to_string()))?;
            if !file.is_file() {
                continue;
            }

            let name = file.name().trim_start_matches('/').replace('\\', "/");
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;
            parts.insert(name, buf);
        }

        let body_part = resolve_body_part(&parts)?;
        let extension = detect_extension(&parts);

        log::debug!(
            "opened package: {} parts, body at {}",
            parts.len(),
            body_part
        );

        Ok(Self {
            parts,
            body_part,
            extension,
        })
    }

    /// Open a package from a file path.
    ///
    /// The file handle is scoped to this call; it is closed before the
    /// function returns, also on error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Open a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Get a part's bytes by name.
    ///
    /// Accepts names with or without a leading `/`; relationship targets
    /// resolve to slash-less part names, but some producers emit rooted
    /// references.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        let name = name.strip_prefix('/').unwrap_or(name);
        self.parts.get(name).map(|v| v.as_slice())
    }

    /// Insert or replace a part.
    pub fn set_part(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.parts.insert(name.into(), bytes);
    }

    /// Iterate over all parts as `(name, bytes)` pairs.
    pub fn parts(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.parts
            .iter()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    /// Iterate over part names.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Number of parts in the package.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Path of the main document body part.
    pub fn body_part(&self) -> &str {
        &self.body_part
    }

    /// Bytes of the main document body part.
    pub fn body_bytes(&self) -> &[u8] {
        // Presence is guaranteed by `resolve_body_part` at open time.
        self.parts
            .get(&self.body_part)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// File extension matching the source container's format.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Build a new package identical to this one except for the body
    /// part, which is replaced with `body`.
    ///
    /// All non-body parts (styles, numbering, media, relationships) are
    /// cloned unchanged, so every relationship target referenced from
    /// the new body keeps resolving.
    pub fn with_body(&self, body: Vec<u8>) -> Self {
        let mut clone = self.clone();
        clone.parts.insert(self.body_part.clone(), body);
        clone
    }

    /// Serialize the package back into archive bytes.
    ///
    /// The output round-trips through [`Package::from_bytes`] into an
    /// equivalent package: same part set, same bytes per part.
    pub fn write_to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Serialize the package into a writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = zip::ZipWriter::new(cursor);
        let options = zip::write::FileOptions::<()>::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, bytes) in &self.parts {
            zip.start_file(name.clone(), options)
                .map_err(|e| Error::ContainerWrite(e.to_string()))?;
            zip.write_all(bytes)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ContainerWrite(e.to_string()))?;
        w.write_all(&cursor.into_inner())?;
        Ok(())
    }
}

/// Resolve the main document part through the package-level rels,
/// falling back to the conventional `word/document.xml`.
fn resolve_body_part(parts: &BTreeMap<String, Vec<u8>>) -> Result<String> {
    let candidate = parts
        .get("_rels/.rels")
        .and_then(|bytes| parse_relationships(bytes).ok())
        .and_then(|rels| {
            rels.into_iter()
                .find(|rel| rel.type_uri == REL_TYPE_OFFICE_DOCUMENT && !rel.is_external())
        })
        .map(|rel| resolve_target("", &rel.target))
        .unwrap_or_else(|| DEFAULT_BODY_PART.to_string());

    if parts.contains_key(&candidate) {
        return Ok(candidate);
    }
    if candidate != DEFAULT_BODY_PART && parts.contains_key(DEFAULT_BODY_PART) {
        return Ok(DEFAULT_BODY_PART.to_string());
    }

    Err(Error::CorruptContainer(format!(
        "missing main document part {candidate}"
    )))
}

/// Pick the conventional extension from `[Content_Types].xml`.
fn detect_extension(parts: &BTreeMap<String, Vec<u8>>) -> String {
    let is_macro = parts
        .get("[Content_Types].xml")
        .map(|bytes| String::from_utf8_lossy(bytes).contains(MACRO_CONTENT_TYPE))
        .unwrap_or(false);

    if is_macro { "docm" } else { "docx" }.to_string()
}
