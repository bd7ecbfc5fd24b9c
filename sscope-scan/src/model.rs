//! Scan data model
//!
//! Three lookup tables are built from a scan file:
//! - `ForensicPaths`: byte offset in the media image → block hash
//! - `Hashes`: block hash → sources known to contain it
//! - `SourceDetails`: source ID → descriptive source metadata

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Byte offset → block hash hex string
pub type ForensicPaths = BTreeMap<u64, String>;

/// Block hash hex string → hash attributes
pub type Hashes = BTreeMap<String, HashAttributes>;

/// Source ID → source detail
pub type SourceDetails = BTreeMap<u64, SourceDetail>;

/// Set of source IDs
pub type SourceIds = BTreeSet<u64>;

/// A (source ID, offset within that source) observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IdOffsetPair {
    pub source_id: u64,
    pub file_offset: u64,
}

impl IdOffsetPair {
    pub fn new(source_id: u64, file_offset: u64) -> Self {
        Self {
            source_id,
            file_offset,
        }
    }
}

/// Attributes recorded for a block hash the first time it is seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashAttributes {
    /// Number of distinct sources; always `source_ids.len()`
    pub count: u64,
    pub source_ids: SourceIds,
    /// Pairs in the order the sources were listed; a source may repeat at
    /// different offsets
    pub id_offset_pairs: Vec<IdOffsetPair>,
    /// Whether the first listed source carries an entropy label
    pub has_label: bool,
}

impl HashAttributes {
    /// Build attributes from the observed pairs
    ///
    /// The source ID set and count are derived from the pairs so the two can
    /// never disagree.
    pub fn new(id_offset_pairs: Vec<IdOffsetPair>, has_label: bool) -> Self {
        let source_ids: SourceIds = id_offset_pairs.iter().map(|p| p.source_id).collect();
        Self {
            count: source_ids.len() as u64,
            source_ids,
            id_offset_pairs,
            has_label,
        }
    }
}

/// Descriptive metadata for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDetail {
    pub source_id: u64,
    pub repository_name: String,
    pub filename: String,
    pub filesize: u64,
    /// Hash digest of the whole source file
    pub content_hash: String,
}
