//! Package core properties (`docProps/core.xml`).

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use super::codec::Package;

/// Document core properties.
///
/// All fields are optional; packages produced by minimal writers often
/// omit the core properties part entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document author
    pub creator: Option<String>,

    /// Last editor
    pub last_modified_by: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl PackageMetadata {
    /// Read the core properties of a package.
    ///
    /// Returns defaults when the part is missing or unreadable; the
    /// properties are informational and never block a split run.
    pub fn from_package(package: &Package) -> Self {
        package
            .part("docProps/core.xml")
            .and_then(|bytes| Self::parse(bytes).ok())
            .unwrap_or_default()
    }

    fn parse(xml: &[u8]) -> crate::error::Result<Self> {
        let mut reader = Reader::from_reader(Cursor::new(xml));
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut metadata = PackageMetadata::default();
        let mut current: Option<Vec<u8>> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => current = Some(e.local_name().as_ref().to_vec()),
                Event::End(_) => current = None,
                Event::Text(e) => {
                    if let Some(ref name) = current {
                        let text = e.unescape()?.into_owned();
                        match name.as_slice() {
                            b"title" => metadata.title = Some(text),
                            b"subject" => metadata.subject = Some(text),
                            b"creator" => metadata.creator = Some(text),
                            b"lastModifiedBy" => metadata.last_modified_by = Some(text),
                            b"created" => metadata.created = parse_w3c_date(&text),
                            b"modified" => metadata.modified = parse_w3c_date(&text),
                            _ => {}
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(metadata)
    }
}

/// Parse a W3CDTF timestamp as used by `dcterms:created`/`dcterms:modified`.
fn parse_w3c_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
