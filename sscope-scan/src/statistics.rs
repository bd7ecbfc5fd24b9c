//! Per-pass scan statistics

use crate::tables::ScanTables;
use serde::Serialize;
use tracing::info;

/// Line counters accumulated during one pass over a scan file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    /// Lines pulled from the input, including the line that halted the pass
    pub lines_read: u64,
    pub blank_lines: u64,
    pub comment_lines: u64,
    /// Lines with fewer than two tab separators, or not valid UTF-8
    pub malformed_lines: u64,
    /// Records skipped because their offset was already read
    pub duplicate_offsets: u64,
    /// Records whose hash had already been decoded from an earlier line
    pub repeated_hashes: u64,
    /// Records that added an offset to the forensic paths table
    pub records: u64,
}

impl ScanStatistics {
    /// Lines skipped without affecting any table
    pub fn skipped_lines(&self) -> u64 {
        self.blank_lines + self.comment_lines + self.malformed_lines + self.duplicate_offsets
    }

    pub(crate) fn log_summary(&self, source: &str, tables: &ScanTables) {
        info!(
            "Scan statistics for '{}': {} lines read, {} records, {} malformed, {} duplicate offsets, {} repeated hashes",
            source,
            self.lines_read,
            self.records,
            self.malformed_lines,
            self.duplicate_offsets,
            self.repeated_hashes
        );
        info!(
            "Number of forensic paths: {}, hashes: {}, sources: {}",
            tables.forensic_paths.len(),
            tables.hashes.len(),
            tables.source_details.len()
        );
    }
}
