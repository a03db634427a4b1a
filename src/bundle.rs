//! Bundling produced documents into one downloadable archive.

use std::io::{Cursor, Write};

use crate::assemble::NamedDocument;
use crate::error::{Error, Result};

/// Pack the produced documents into a single ZIP archive, one entry
/// per document, in partition order.
pub fn write_bundle(documents: &[NamedDocument]) -> Result<Vec<u8>> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(cursor);
    // Entries are already deflate-compressed packages; store as-is.
    let options =
        zip::write::FileOptions::<()>::default().compression_method(zip::CompressionMethod::Stored);

    for document in documents {
        zip.start_file(document.file_name.clone(), options)
            .map_err(|e| Error::ContainerWrite(e.to_string()))?;
        zip.write_all(&document.bytes)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| Error::ContainerWrite(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_bundle_lists_documents_in_order() {
        let documents = vec![
            NamedDocument {
                file_name: "PROCURATION - A - 1.docx".to_string(),
                bytes: b"first".to_vec(),
            },
            NamedDocument {
                file_name: "PROCURATION - B - 2.docx".to_string(),
                bytes: b"second".to_vec(),
            },
        ];

        let bundle = write_bundle(&documents).unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bundle)).unwrap();
        assert_eq!(zip.len(), 2);

        let mut first = String::new();
        zip.by_name("PROCURATION - A - 1.docx")
            .unwrap()
            .read_to_string(&mut first)
            .unwrap();
        assert_eq!(first, "first");
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = write_bundle(&[]).unwrap();
        let zip = zip::ZipArchive::new(Cursor::new(bundle)).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
