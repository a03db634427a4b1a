//! Relationship manifests (`*.rels` parts).
//!
//! Each part may carry a sibling `_rels/<name>.rels` manifest mapping
//! relationship ids to target parts (media, styles, hyperlinks). The
//! partitioner uses these to confirm resource references stay
//! resolvable in every output package.

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

use super::codec::Package;

/// One entry of a relationship manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (`r:id` values in the referencing part).
    pub id: String,
    /// Relationship type URI.
    pub type_uri: String,
    /// Target reference, relative to the source part's folder.
    pub target: String,
    /// `TargetMode` attribute; `External` targets live outside the package.
    pub target_mode: Option<String>,
}

impl Relationship {
    /// Whether the target lives outside the package (e.g. a hyperlink).
    pub fn is_external(&self) -> bool {
        self.target_mode
            .as_deref()
            .is_some_and(|mode| mode.trim().eq_ignore_ascii_case("External"))
    }
}

/// Manifest part name for a given part, e.g.
/// `word/document.xml` -> `word/_rels/document.xml.rels`.
pub fn rels_part_name(part_name: &str) -> String {
    let (dir, file) = part_name.rsplit_once('/').unwrap_or(("", part_name));
    if dir.is_empty() {
        format!("_rels/{file}.rels")
    } else {
        format!("{dir}/_rels/{file}.rels")
    }
}

/// Parse a relationship manifest.
pub fn parse_relationships(xml: &[u8]) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(Cursor::new(xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut relationships = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::CorruptContainer(format!("invalid relationships part: {e}")))?
        {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut type_uri = None;
                let mut target = None;
                let mut target_mode = None;

                for attr in e.attributes() {
                    let attr = attr.map_err(|e| {
                        Error::CorruptContainer(format!("invalid relationship attribute: {e}"))
                    })?;
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Type" => type_uri = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => target_mode = Some(value),
                        _ => {}
                    }
                }

                if let (Some(id), Some(type_uri), Some(target)) = (id, type_uri, target) {
                    relationships.push(Relationship {
                        id,
                        type_uri,
                        target,
                        target_mode,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Parse the relationships of a part, or an empty list if the part has
/// no manifest.
pub fn part_relationships(package: &Package, part_name: &str) -> Result<Vec<Relationship>> {
    match package.part(&rels_part_name(part_name)) {
        Some(bytes) => parse_relationships(bytes),
        None => Ok(Vec::new()),
    }
}

/// Resolve a relationship target against its source part's folder.
///
/// Targets may be relative (`media/image1.png`), may climb
/// (`../media/image1.png`), or may be rooted at the package
/// (`/word/media/image1.png`).
pub fn resolve_target(base_part: &str, target: &str) -> String {
    let (target, is_absolute) = match target.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (target, false),
    };

    let base_dir = if is_absolute {
        ""
    } else {
        base_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    };

    let mut components: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            _ => components.push(segment),
        }
    }

    components.join("/")
}
