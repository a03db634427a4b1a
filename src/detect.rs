//! Container format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Container format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFormat {
    /// File extension the format is conventionally stored under
    /// (e.g., "docx", "docm")
    pub extension: String,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OOXML package (.{})", self.extension)
    }
}

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the container format from a file path.
///
/// Reads only the archive header; the package contents are validated
/// later when the container is opened.
///
/// # Example
/// ```no_run
/// use docsplit::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("composite.docx").unwrap();
/// println!("Format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerFormat> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;

    let mut format = detect_format_from_bytes(&header)?;

    // The archive magic cannot distinguish .docx from .docm; trust the
    // file extension for the conventional name when it is one of ours.
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if ext == "docm" {
            format.extension = ext;
        }
    }

    Ok(format)
}

/// Detect the container format from bytes.
///
/// # Arguments
/// * `data` - Byte slice containing at least the first 4 bytes of the file
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ContainerFormat> {
    if data.len() < ZIP_MAGIC.len() {
        return Err(Error::CorruptContainer(
            "input shorter than an archive header".into(),
        ));
    }

    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::CorruptContainer("not a ZIP archive".into()));
    }

    Ok(ContainerFormat {
        extension: "docx".to_string(),
    })
}

/// Check if a file looks like an OOXML package archive.
pub fn is_ooxml<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with a ZIP archive header.
pub fn is_ooxml_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_archive() {
        let data = b"PK\x03\x04\x14\x00\x00\x00";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.extension, "docx");
    }

    #[test]
    fn test_detect_invalid_format() {
        let data = b"<!DOCTYPE html>";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::CorruptContainer(_))));
    }

    #[test]
    fn test_detect_too_short() {
        let data = b"PK";
        let result = detect_format_from_bytes(data);
        assert!(matches!(result, Err(Error::CorruptContainer(_))));
    }

    #[test]
    fn test_detect_empty_archive_marker() {
        // PK\x05\x06 is an empty central directory, not a usable package
        let data = b"PK\x05\x06\x00\x00\x00\x00";
        assert!(!is_ooxml_bytes(data));
    }

    #[test]
    fn test_is_ooxml_bytes() {
        assert!(is_ooxml_bytes(b"PK\x03\x04rest"));
        assert!(!is_ooxml_bytes(b"%PDF-1.7"));
        assert!(!is_ooxml_bytes(b""));
    }
}
