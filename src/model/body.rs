//! Document body parsing and serialization.
//!
//! The body part is split into an envelope (everything outside the
//! top-level body children, held verbatim) and an ordered node sequence
//! whose payloads are exact byte slices of the source. Serialization is
//! a pure concatenation of those pieces, so `serialize(parse(x)) == x`
//! holds for any well-formed body part.

use std::ops::Range;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

use super::node::{BlockNode, NodeKind};

/// Typed, mutable in-memory representation of the document body: an
/// ordered sequence of block-level nodes with all attributes and
/// styling preserved as opaque payload.
///
/// Node order is significant and defines document reading order.
#[derive(Debug, Clone)]
pub struct DocumentBody {
    /// Bytes before the first body child (XML declaration, root and
    /// body open tags).
    prologue: Vec<u8>,
    nodes: Vec<BlockNode>,
    /// The body's trailing section properties, replicated into every
    /// partition so outputs keep the source page geometry.
    section: Option<Vec<u8>>,
    /// Bytes from the body close tag to the end of the part.
    epilogue: Vec<u8>,
}

/// A body child recorded during the offset scan.
struct RawChild {
    offset: usize,
    kind: NodeKind,
    is_section_props: bool,
}

impl DocumentBody {
    /// Parse a body part into one node per top-level content child.
    ///
    /// Fails with [`Error::MalformedBody`] if the XML is not well-formed
    /// or lacks a body element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();

        let mut depth = 0usize;
        let mut root_seen = false;
        let mut in_body = false;
        let mut body_seen = false;
        let mut body_child_depth = 0usize;
        let mut body_end_offset: Option<usize> = None;
        let mut children: Vec<RawChild> = Vec::new();

        loop {
            let event_offset = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    root_seen = true;
                    if in_body && depth == body_child_depth {
                        children.push(RawChild {
                            offset: event_offset,
                            kind: NodeKind::from_element(e.local_name().as_ref()),
                            is_section_props: e.local_name().as_ref() == b"sectPr",
                        });
                    } else if !body_seen && e.local_name().as_ref() == b"body" {
                        in_body = true;
                        body_seen = true;
                        body_child_depth = depth + 1;
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    root_seen = true;
                    if in_body && depth == body_child_depth {
                        children.push(RawChild {
                            offset: event_offset,
                            kind: NodeKind::from_element(e.local_name().as_ref()),
                            is_section_props: e.local_name().as_ref() == b"sectPr",
                        });
                    } else if !body_seen && e.local_name().as_ref() == b"body" {
                        // Self-closed empty body.
                        body_seen = true;
                        body_end_offset = Some(event_offset);
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if in_body
                        && depth + 1 == body_child_depth
                        && e.local_name().as_ref() == b"body"
                    {
                        in_body = false;
                        body_end_offset = Some(event_offset);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !root_seen {
            return Err(Error::MalformedBody("missing root element".into()));
        }
        let body_end = body_end_offset
            .ok_or_else(|| Error::MalformedBody("missing body element".into()))?;

        Ok(Self::assemble(bytes, children, body_end))
    }

    /// Build the body from the recorded child offsets.
    ///
    /// Each payload spans from its child's open tag to the next
    /// sibling's open tag (or the body close), so inter-node whitespace
    /// travels with the preceding node and concatenation stays exact.
    fn assemble(bytes: &[u8], children: Vec<RawChild>, body_end: usize) -> Self {
        if children.is_empty() {
            return Self {
                prologue: bytes[..body_end].to_vec(),
                nodes: Vec::new(),
                section: None,
                epilogue: bytes[body_end..].to_vec(),
            };
        }

        let prologue = bytes[..children[0].offset].to_vec();
        let epilogue = bytes[body_end..].to_vec();

        let (content, section) = match children.last() {
            Some(last) if last.is_section_props => {
                let section = bytes[last.offset..body_end].to_vec();
                (&children[..children.len() - 1], Some(section))
            }
            _ => (&children[..], None),
        };

        let content_end = match &section {
            Some(_) => children[children.len() - 1].offset,
            None => body_end,
        };

        let mut nodes = Vec::with_capacity(content.len());
        for (i, child) in content.iter().enumerate() {
            let end = content
                .get(i + 1)
                .map(|next| next.offset)
                .unwrap_or(content_end);
            nodes.push(BlockNode::new(child.kind, bytes[child.offset..end].to_vec()));
        }

        Self {
            prologue,
            nodes,
            section,
            epilogue,
        }
    }

    /// Serialize the body back into part bytes.
    ///
    /// Exact inverse of [`DocumentBody::parse`].
    pub fn serialize(&self) -> Vec<u8> {
        let section_len = self.section.as_ref().map(Vec::len).unwrap_or(0);
        let payload_len: usize = self.nodes.iter().map(|n| n.payload().len()).sum();
        let mut out =
            Vec::with_capacity(self.prologue.len() + payload_len + section_len + self.epilogue.len());

        out.extend_from_slice(&self.prologue);
        for node in &self.nodes {
            out.extend_from_slice(node.payload());
        }
        if let Some(section) = &self.section {
            out.extend_from_slice(section);
        }
        out.extend_from_slice(&self.epilogue);
        out
    }

    /// The ordered node sequence.
    pub fn nodes(&self) -> &[BlockNode] {
        &self.nodes
    }

    /// Get a node by index.
    pub fn node(&self, index: usize) -> Option<&BlockNode> {
        self.nodes.get(index)
    }

    /// Number of content nodes in the body.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the body has no content nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build a new body holding a deep, independent copy of the nodes
    /// in `range`, under a copy of this body's envelope.
    ///
    /// The copies share nothing with the source; mutating or discarding
    /// the source afterwards never affects the partition.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds; callers validate ranges
    /// against [`DocumentBody::node_count`] first.
    pub fn partition_range(&self, range: Range<usize>) -> Self {
        Self {
            prologue: self.prologue.clone(),
            nodes: self.nodes[range].to_vec(),
            section: self.section.clone(),
            epilogue: self.epilogue.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>First</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/><w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#;

    #[test]
    fn test_parse_counts_content_nodes() {
        let body = DocumentBody::parse(BODY).unwrap();
        assert_eq!(body.node_count(), 3);
        assert_eq!(body.node(0).unwrap().kind(), NodeKind::Paragraph);
        assert_eq!(body.node(1).unwrap().kind(), NodeKind::Table);
        assert_eq!(body.node(2).unwrap().kind(), NodeKind::Paragraph);
        assert!(body.section.is_some());
    }

    #[test]
    fn test_round_trip_is_exact() {
        let body = DocumentBody::parse(BODY).unwrap();
        assert_eq!(body.serialize(), BODY);
    }

    #[test]
    fn test_round_trip_with_internal_whitespace() {
        let xml = b"<w:document xmlns:w=\"ns\">\n  <w:body>\n    <w:p/>\n    <w:p/>\n  </w:body>\n</w:document>\n";
        let body = DocumentBody::parse(xml).unwrap();
        assert_eq!(body.node_count(), 2);
        assert_eq!(body.serialize(), xml);
    }

    #[test]
    fn test_empty_body() {
        let xml = br#"<w:document xmlns:w="ns"><w:body></w:body></w:document>"#;
        let body = DocumentBody::parse(xml).unwrap();
        assert!(body.is_empty());
        assert_eq!(body.serialize(), xml);
    }

    #[test]
    fn test_self_closed_body() {
        let xml = br#"<w:document xmlns:w="ns"><w:body/></w:document>"#;
        let body = DocumentBody::parse(xml).unwrap();
        assert!(body.is_empty());
        assert_eq!(body.serialize(), xml);
    }

    #[test]
    fn test_missing_body_is_malformed() {
        let xml = br#"<w:document xmlns:w="ns"><w:header/></w:document>"#;
        let result = DocumentBody::parse(xml);
        assert!(matches!(result, Err(Error::MalformedBody(_))));
    }

    #[test]
    fn test_broken_xml_is_malformed() {
        let xml = br#"<w:document><w:body><w:p></w:body></w:document>"#;
        assert!(DocumentBody::parse(xml).is_err());
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let result = DocumentBody::parse(b"");
        assert!(matches!(result, Err(Error::MalformedBody(_))));
    }

    #[test]
    fn test_partition_replicates_envelope() {
        let body = DocumentBody::parse(BODY).unwrap();
        let part = body.partition_range(0..1);

        assert_eq!(part.node_count(), 1);
        assert_eq!(part.node(0).unwrap().payload(), body.node(0).unwrap().payload());

        let serialized = part.serialize();
        let text = String::from_utf8(serialized).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<w:sectPr>"));
        assert!(text.ends_with("</w:body></w:document>"));
    }

    #[test]
    fn test_partition_is_independent() {
        let body = DocumentBody::parse(BODY).unwrap();
        let part = body.partition_range(1..3);
        let snapshot = part.serialize();

        drop(body);
        assert_eq!(part.serialize(), snapshot);
    }

    #[test]
    fn test_payload_concatenation_covers_source() {
        let body = DocumentBody::parse(BODY).unwrap();
        let all: Vec<u8> = body
            .nodes()
            .iter()
            .flat_map(|n| n.payload().to_vec())
            .collect();

        let first = body.partition_range(0..2);
        let second = body.partition_range(2..3);
        let rejoined: Vec<u8> = first
            .nodes()
            .iter()
            .chain(second.nodes().iter())
            .flat_map(|n| n.payload().to_vec())
            .collect();

        assert_eq!(all, rejoined);
    }
}
