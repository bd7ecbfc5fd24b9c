//! Helpers for bulk_extractor forensic paths
//!
//! A forensic path names where in a media image a block was found. For plain
//! images it is a decimal byte offset; recursive paths such as
//! `4096-GZIP-12` start with the offset of the outermost container.

/// Parse the byte offset at the start of a forensic path.
///
/// Leading whitespace and one optional `+` sign are skipped, then the leading
/// run of decimal digits is taken. A path with no leading digits, a negative
/// sign, or digits that overflow `u64` yields 0. This matches the leniency
/// of C `atol`, which scan files have always been read with.
///
/// # Examples
///
/// ```
/// use sscope_common::forensic_path::parse_offset;
///
/// assert_eq!(parse_offset("512"), 512);
/// assert_eq!(parse_offset("  4096-GZIP-12"), 4096);
/// assert_eq!(parse_offset("not-a-number"), 0);
/// ```
pub fn parse_offset(forensic_path: &str) -> u64 {
    let trimmed = forensic_path.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_end].parse::<u64>().unwrap_or(0)
}

/// Format an offset for display as `0x%08x (%d)`.
///
/// `None` means no offset has been selected.
///
/// # Examples
///
/// ```
/// use sscope_common::forensic_path::offset_string;
///
/// assert_eq!(offset_string(Some(4096)), "0x00001000 (4096)");
/// assert_eq!(offset_string(None), "Not selected");
/// ```
pub fn offset_string(offset: Option<u64>) -> String {
    match offset {
        Some(offset) => format!("0x{:08x} ({})", offset, offset),
        None => "Not selected".to_string(),
    }
}
