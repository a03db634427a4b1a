//! Block-level node types.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Discriminator for a top-level block element of the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A paragraph (`w:p`)
    Paragraph,
    /// A table (`w:tbl`)
    Table,
    /// A drawing or embedded object
    Drawing,
    /// Any other block element, kept opaque
    Other,
}

impl NodeKind {
    /// Classify a body child by its element's local name.
    pub(crate) fn from_element(local_name: &[u8]) -> Self {
        match local_name {
            b"p" => NodeKind::Paragraph,
            b"tbl" => NodeKind::Table,
            b"drawing" | b"pict" | b"object" => NodeKind::Drawing,
            _ => NodeKind::Other,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Paragraph => write!(f, "paragraph"),
            NodeKind::Table => write!(f, "table"),
            NodeKind::Drawing => write!(f, "drawing"),
            NodeKind::Other => write!(f, "other"),
        }
    }
}

/// One top-level structural unit of document content.
///
/// The payload is the node's exact serialized subtree, preserving every
/// attribute and nested run/style verbatim. It is copied byte-for-byte
/// and never reinterpreted; the discriminator and resource references
/// are the only derived views of it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    kind: NodeKind,
    payload: Vec<u8>,
    resource_refs: Vec<String>,
}

impl BlockNode {
    /// Build a node from its serialized subtree.
    pub fn new(kind: NodeKind, payload: Vec<u8>) -> Self {
        let resource_refs = collect_resource_refs(&payload);
        Self {
            kind,
            payload,
            resource_refs,
        }
    }

    /// The node's discriminator.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's serialized subtree, byte-for-byte.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Relationship ids referenced from the payload (`r:id`, `r:embed`).
    ///
    /// Used only for reachability analysis; the payload itself is the
    /// source of truth.
    pub fn resource_refs(&self) -> &[String] {
        &self.resource_refs
    }

    /// Check if this node is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, NodeKind::Paragraph)
    }

    /// Check if this node is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, NodeKind::Table)
    }

    /// Extract the node's visible text content (the `w:t` runs, in
    /// document order).
    pub fn text(&self) -> String {
        let mut reader = Reader::from_reader(self.payload.as_slice());
        let mut buf = Vec::new();
        let mut text = String::new();
        let mut run_depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => run_depth += 1,
                Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => {
                    run_depth = run_depth.saturating_sub(1)
                }
                Ok(Event::Text(e)) if run_depth > 0 => {
                    if let Ok(s) = e.unescape() {
                        text.push_str(&s);
                    }
                }
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        text
    }
}

/// Scan a payload for relationship-id attributes.
fn collect_resource_refs(payload: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(payload);
    let mut buf = Vec::new();
    let mut refs: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes().flatten() {
                    if matches!(attr.key.as_ref(), b"r:id" | b"r:embed" | b"r:link") {
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        if !refs.contains(&value) {
                            refs.push(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_element() {
        assert_eq!(NodeKind::from_element(b"p"), NodeKind::Paragraph);
        assert_eq!(NodeKind::from_element(b"tbl"), NodeKind::Table);
        assert_eq!(NodeKind::from_element(b"drawing"), NodeKind::Drawing);
        assert_eq!(NodeKind::from_element(b"sdt"), NodeKind::Other);
    }

    #[test]
    fn test_text_extraction() {
        let payload =
            br#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t xml:space="preserve">world</w:t></w:r></w:p>"#;
        let node = BlockNode::new(NodeKind::Paragraph, payload.to_vec());
        assert_eq!(node.text(), "Hello world");
    }

    #[test]
    fn test_text_unescapes_entities() {
        let payload = br#"<w:p><w:r><w:t>Fish &amp; Chips</w:t></w:r></w:p>"#;
        let node = BlockNode::new(NodeKind::Paragraph, payload.to_vec());
        assert_eq!(node.text(), "Fish & Chips");
    }

    #[test]
    fn test_resource_refs() {
        let payload = br#"<w:p><w:r><w:drawing><a:blip r:embed="rId7"/></w:drawing></w:r><w:hyperlink r:id="rId8"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#;
        let node = BlockNode::new(NodeKind::Paragraph, payload.to_vec());
        assert_eq!(node.resource_refs(), ["rId7", "rId8"]);
    }

    #[test]
    fn test_payload_is_preserved_verbatim() {
        let payload = br#"<w:p w:rsidR="00AB12"><w:pPr><w:jc w:val="center"/></w:pPr></w:p>"#;
        let node = BlockNode::new(NodeKind::Paragraph, payload.to_vec());
        assert_eq!(node.payload(), payload);
    }
}
