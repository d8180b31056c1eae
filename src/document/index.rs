//! Id index over a parsed card document

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::CardError;

/// Map from `id` attribute to element, built once per parsed document
pub struct NodeIndex<'a, 'input> {
    by_id: HashMap<&'a str, Node<'a, 'input>>,
}

impl<'a, 'input> NodeIndex<'a, 'input> {
    /// Index every element carrying an `id`. The first element in document order wins.
    pub fn build(doc: &'a Document<'input>) -> Self {
        let mut by_id = HashMap::new();
        for node in doc.descendants().filter(Node::is_element) {
            if let Some(id) = node.attribute("id") {
                by_id.entry(id).or_insert(node);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<Node<'a, 'input>> {
        self.by_id.get(id).copied()
    }

    /// Look up an element, failing with [`CardError::MissingNode`] if absent
    pub fn require(&self, id: &str, path: &Path) -> Result<Node<'a, 'input>, CardError> {
        self.get(id).ok_or_else(|| CardError::missing_node(id, path))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

/// Where an element's leading text lives in the source, and how to replace it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSlot {
    /// An existing text node occupying this byte range
    Text(Range<usize>),
    /// No text yet; new text goes at this byte offset
    Insert(usize),
    /// Self-closing element; the `/>` at this range must become `>text</name>`
    SelfClosing { range: Range<usize>, name: String },
}

/// The element's leading text (before its first child element) and its slot in `source`
///
/// Adjacent text and CDATA sections form a single text node, so the slot runs
/// up to the next non-text sibling or the closing tag.
pub fn text_slot(node: Node<'_, '_>, source: &str) -> (String, TextSlot) {
    if let Some(first) = node.first_child() {
        if first.is_text() {
            let text = first.text().unwrap_or_default().to_string();
            let end = match first.next_sibling() {
                Some(next) => next.range().start,
                None => closing_tag_start(node, source),
            };
            return (text, TextSlot::Text(first.range().start..end));
        }
        return (String::new(), TextSlot::Insert(first.range().start));
    }

    let range = node.range();
    let raw = &source[range.clone()];
    if raw.ends_with("/>") {
        let name = raw[1..]
            .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .next()
            .unwrap_or_default()
            .to_string();
        return (
            String::new(),
            TextSlot::SelfClosing {
                range: range.end - 2..range.end,
                name,
            },
        );
    }

    (String::new(), TextSlot::Insert(closing_tag_start(node, source)))
}

/// Byte offset of the element's `</name>`
fn closing_tag_start(node: Node<'_, '_>, source: &str) -> usize {
    let range = node.range();
    source[range.clone()]
        .rfind("</")
        .map_or(range.end, |i| range.start + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <text id="os">Windows</text>
  <text id="os">Duplicate</text>
  <text id="empty"></text>
  <tspan id="closed" x="1" />
  <text id="nested"><tspan>child</tspan></text>
  <text id="escaped">a &amp; b</text>
  <text id="cdata">Win<![CDATA[dows]]><tspan>x</tspan></text>
  <text id="cdata_only">Win<![CDATA[dows]]></text>
</svg>"#;

    #[test]
    fn test_first_duplicate_wins() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let node = index.get("os").expect("os indexed");
        assert_eq!(node.text(), Some("Windows"));
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn test_require_reports_missing_id() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let err = index.require("host", Path::new("card.svg")).unwrap_err();
        assert!(matches!(err, CardError::MissingNode { ref id, .. } if id == "host"));
    }

    #[test]
    fn test_text_slot_existing_text() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let (text, slot) = text_slot(index.get("os").unwrap(), CARD);
        assert_eq!(text, "Windows");
        match slot {
            TextSlot::Text(range) => assert_eq!(&CARD[range], "Windows"),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_text_slot_decodes_entities_but_keeps_raw_range() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let (text, slot) = text_slot(index.get("escaped").unwrap(), CARD);
        assert_eq!(text, "a & b");
        match slot {
            TextSlot::Text(range) => assert_eq!(&CARD[range], "a &amp; b"),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_text_slot_empty_element() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let (text, slot) = text_slot(index.get("empty").unwrap(), CARD);
        assert_eq!(text, "");
        match slot {
            TextSlot::Insert(at) => assert!(CARD[at..].starts_with("</text>")),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_text_slot_child_without_text() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let (text, slot) = text_slot(index.get("nested").unwrap(), CARD);
        assert_eq!(text, "");
        match slot {
            TextSlot::Insert(at) => assert!(CARD[at..].starts_with("<tspan>child")),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_text_slot_self_closing() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);
        let (text, slot) = text_slot(index.get("closed").unwrap(), CARD);
        assert_eq!(text, "");
        match slot {
            TextSlot::SelfClosing { range, name } => {
                assert_eq!(&CARD[range], "/>");
                assert_eq!(name, "tspan");
            }
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_text_slot_covers_merged_cdata() {
        let doc = Document::parse(CARD).expect("Should parse");
        let index = NodeIndex::build(&doc);

        let (text, slot) = text_slot(index.get("cdata").unwrap(), CARD);
        assert_eq!(text, "Windows");
        match slot {
            TextSlot::Text(range) => assert_eq!(&CARD[range], "Win<![CDATA[dows]]>"),
            other => panic!("unexpected slot {:?}", other),
        }

        let (text, slot) = text_slot(index.get("cdata_only").unwrap(), CARD);
        assert_eq!(text, "Windows");
        match slot {
            TextSlot::Text(range) => assert_eq!(&CARD[range], "Win<![CDATA[dows]]>"),
            other => panic!("unexpected slot {:?}", other),
        }
    }
}
