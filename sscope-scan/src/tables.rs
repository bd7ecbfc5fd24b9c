//! Table building with offset and hash deduplication
//!
//! Policies applied per record, in order:
//! 1. An offset already in `forensic_paths` skips the whole record.
//! 2. A hash already in `hashes` only adds the offset; its JSON is not
//!    decoded and the existing entry is never touched.
//! 3. A new hash has its JSON decoded first. On failure nothing is
//!    inserted. On success the offset, the hash attributes and any source
//!    details are inserted; source details overwrite earlier ones.

use crate::error::FragmentError;
use crate::fragment::FragmentDecoder;
use crate::model::{ForensicPaths, HashAttributes, Hashes, SourceDetails};
use crate::tokenizer::RawRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// The three lookup tables built from a scan file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanTables {
    pub forensic_paths: ForensicPaths,
    pub hashes: Hashes,
    pub source_details: SourceDetails,
}

impl ScanTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forensic_paths.is_empty() && self.hashes.is_empty() && self.source_details.is_empty()
    }

    /// Every file offset observed per source, across all hashes
    pub fn sources_offsets(&self) -> BTreeMap<u64, BTreeSet<u64>> {
        let mut offsets: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for attributes in self.hashes.values() {
            for pair in &attributes.id_offset_pairs {
                offsets
                    .entry(pair.source_id)
                    .or_default()
                    .insert(pair.file_offset);
            }
        }
        offsets
    }

    /// Forensic path offsets at which the given hash was found
    pub fn offsets_for_hash(&self, hash: &str) -> Vec<u64> {
        self.forensic_paths
            .iter()
            .filter(|(_, h)| h.as_str() == hash)
            .map(|(offset, _)| *offset)
            .collect()
    }
}

/// What applying one record did to the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Offset and a previously unseen hash were inserted
    NewHash,
    /// Offset inserted; hash content was already known
    KnownHash,
    /// Offset already present; record skipped
    DuplicateOffset(u64),
}

/// Applies tokenized records to the scan tables
#[derive(Debug, Default)]
pub struct TableBuilder {
    tables: ScanTables,
    decoder: FragmentDecoder,
}

impl TableBuilder {
    pub fn new(decoder: FragmentDecoder) -> Self {
        Self {
            tables: ScanTables::new(),
            decoder,
        }
    }

    pub fn tables(&self) -> &ScanTables {
        &self.tables
    }

    pub fn into_tables(self) -> ScanTables {
        self.tables
    }

    /// Apply one record
    ///
    /// A fragment error leaves all three tables unchanged.
    pub fn apply(&mut self, record: &RawRecord<'_>) -> Result<RecordOutcome, FragmentError> {
        let offset = record.offset();
        if self.tables.forensic_paths.contains_key(&offset) {
            return Ok(RecordOutcome::DuplicateOffset(offset));
        }

        if self.tables.hashes.contains_key(record.hash) {
            self.tables
                .forensic_paths
                .insert(offset, record.hash.to_string());
            trace!(offset, hash = record.hash, "Hash already processed");
            return Ok(RecordOutcome::KnownHash);
        }

        let decoded = self.decoder.decode(record.remainder)?;

        self.tables
            .forensic_paths
            .insert(offset, record.hash.to_string());

        for detail in decoded.source_details() {
            self.tables.source_details.insert(detail.source_id, detail);
        }

        let attributes = HashAttributes::new(decoded.id_offset_pairs, decoded.has_label);
        trace!(
            offset,
            hash = record.hash,
            count = attributes.count,
            "New hash"
        );
        self.tables
            .hashes
            .insert(record.hash.to_string(), attributes);

        Ok(RecordOutcome::NewHash)
    }
}
