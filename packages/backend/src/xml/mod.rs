//! XML parsing and text extraction.

pub mod text;

pub use text::{count_words, decode_document, extract_text, parse_document, word_count_of};
