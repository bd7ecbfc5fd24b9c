//! Scan file line tokenizer
//!
//! Each record line has the form
//! `<forensic path> TAB <block hash> TAB <json fragment>`. Only the first two
//! tabs split fields; the JSON fragment may itself contain tabs.
//!
//! Comment lines are recognized on raw bytes, so banner comments carrying
//! non-UTF-8 image paths never need decoding.

use sscope_common::forensic_path::parse_offset;

/// Classification of one raw line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty line
    Blank,
    /// Line starting with `#`
    Comment,
    /// Fewer than two tab separators
    Malformed,
    /// Non-comment line that is not valid UTF-8
    Undecodable,
    /// Three tab-separated fields
    Record(RawRecord<'a>),
}

/// Fields of a record line, borrowed from the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub forensic_path: &'a str,
    pub hash: &'a str,
    pub remainder: &'a str,
}

impl RawRecord<'_> {
    /// Byte offset named by the forensic path (0 when not numeric)
    pub fn offset(&self) -> u64 {
        parse_offset(self.forensic_path)
    }
}

/// Classify one raw line (without its `\n` terminator)
///
/// A trailing `\r` is dropped. Blank and comment lines are recognized
/// before any UTF-8 decoding.
pub fn tokenize_bytes(line: &[u8]) -> LineKind<'_> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line[0] == b'#' {
        return LineKind::Comment;
    }
    match std::str::from_utf8(line) {
        Ok(text) => tokenize(text),
        Err(_) => LineKind::Undecodable,
    }
}

/// Split one line (without its line terminator) into fields
pub fn tokenize(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with('#') {
        return LineKind::Comment;
    }

    let Some((forensic_path, rest)) = line.split_once('\t') else {
        return LineKind::Malformed;
    };
    let Some((hash, remainder)) = rest.split_once('\t') else {
        return LineKind::Malformed;
    };

    LineKind::Record(RawRecord {
        forensic_path,
        hash,
        remainder,
    })
}
