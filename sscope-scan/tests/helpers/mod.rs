//! Shared helpers for sscope-scan integration tests

#![allow(dead_code)]

pub mod log_capture;

use std::io::Write;
use tempfile::NamedTempFile;

/// Fragment with one entry per (source_id, file_offset) pair
pub fn fragment(pairs: &[(u64, u64)]) -> String {
    let sources: Vec<String> = pairs
        .iter()
        .map(|(id, offset)| format!("{{\"source_id\":{},\"file_offset\":{}}}", id, offset))
        .collect();
    format!("[{{}},{{\"sources\":[{}]}}]", sources.join(","))
}

/// Record line without trailing newline
pub fn line(offset: u64, hash: &str, json: &str) -> String {
    format!("{}\t{}\t{}", offset, hash, json)
}

/// Write lines to a temporary scan file
pub fn scan_file(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    for l in lines {
        writeln!(file, "{}", l).expect("Should write line");
    }
    file.flush().expect("Should flush");
    file
}
