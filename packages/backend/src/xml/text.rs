//! Flattening an XML tree into plain text and counting its words.

use std::sync::LazyLock;

use regex::bytes::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::Result;

/// `encoding="..."` in the XML declaration at the start of a document.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?-u:\xEF\xBB\xBF)?<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
        .expect("valid regex")
});

/// Decode a downloaded document according to its XML declaration.
///
/// ISO-8859-1 (Latin-1) maps every byte to the code point of the same
/// value; anything else is read as UTF-8.
///
/// # Examples
/// ```
/// use ecfr_backend::xml::decode_document;
///
/// let latin1 = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><P>caf\xE9</P>";
/// assert!(decode_document(latin1.to_vec()).unwrap().ends_with("<P>caf\u{e9}</P>"));
/// ```
pub fn decode_document(bytes: Vec<u8>) -> Result<String> {
    let declared = DECLARED_ENCODING
        .captures(&bytes)
        .and_then(|c| c.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).to_ascii_lowercase());

    match declared.as_deref() {
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1") => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        _ => Ok(String::from_utf8(bytes)?),
    }
}

/// Parse an XML string into a DOM tree.
///
/// Full-title documents may carry a DOCTYPE, so DTDs are allowed.
pub fn parse_document(xml: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}

/// Concatenate the text of a node and all its descendant elements.
///
/// Each element contributes its own leading text (every text run before its
/// first child element, with comments and processing instructions dropped),
/// followed by the extraction of each child element in document order.
/// Nothing is inserted between fragments, and text that follows a child's
/// closing tag is not part of any element's own text.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ecfr_backend::xml::extract_text;
///
/// let doc = Document::parse("<p>one <b>two</b> three</p>").unwrap();
/// assert_eq!(extract_text(doc.root_element()), "one two");
/// ```
pub fn extract_text(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: Node<'_, '_>, out: &mut String) {
    for text in node
        .children()
        .take_while(|c| !c.is_element())
        .filter_map(|c| if c.is_text() { c.text() } else { None })
    {
        out.push_str(text);
    }
    for child in node.children().filter(|c| c.is_element()) {
        push_text(child, out);
    }
}

/// Count whitespace-separated tokens.
///
/// # Examples
/// ```
/// use ecfr_backend::xml::count_words;
///
/// assert_eq!(count_words("  Title 7\tAgriculture\n"), 3);
/// assert_eq!(count_words(""), 0);
/// ```
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Parse an XML document and count the words of its extracted text.
pub fn word_count_of(xml: &str) -> Result<usize> {
    let doc = parse_document(xml)?;
    Ok(count_words(&extract_text(doc.root_element())))
}
