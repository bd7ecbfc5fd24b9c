//! Text and JSON rendering of scan results for the command line

use crate::reader::ScanReader;
use crate::tables::ScanTables;
use clap::ValueEnum;
use serde_json::{json, Map, Value};
use sscope_common::forensic_path::offset_string;
use std::io::{self, Write};

/// Table selection for dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpTable {
    ForensicPaths,
    Hashes,
    SourceDetails,
    SourcesOffsets,
    All,
}

impl DumpTable {
    fn includes(self, table: DumpTable) -> bool {
        self == DumpTable::All || self == table
    }
}

/// Write the statistics block
pub fn write_summary<W: Write>(out: &mut W, reader: &ScanReader) -> io::Result<()> {
    let stats = reader.statistics();
    let tables = reader.tables();

    writeln!(out, "Scan file: '{}'", reader.source())?;
    writeln!(out, "Valid: {}", if reader.is_valid() { "yes" } else { "no" })?;
    if !reader.is_valid() {
        writeln!(out, "Error: {}", reader.error_message())?;
    }
    writeln!(out, "Lines read: {}", stats.lines_read)?;
    writeln!(out, "Records: {}", stats.records)?;
    writeln!(out, "Comment lines: {}", stats.comment_lines)?;
    writeln!(out, "Blank lines: {}", stats.blank_lines)?;
    writeln!(out, "Malformed lines: {}", stats.malformed_lines)?;
    writeln!(out, "Duplicate offsets: {}", stats.duplicate_offsets)?;
    writeln!(out, "Repeated hashes: {}", stats.repeated_hashes)?;
    writeln!(out, "Skipped lines: {}", stats.skipped_lines())?;
    writeln!(out, "Number of forensic paths: {}", tables.forensic_paths.len())?;
    writeln!(out, "Number of hashes: {}", tables.hashes.len())?;
    writeln!(out, "Number of sources: {}", tables.source_details.len())?;
    Ok(())
}

/// Write the selected tables as tab-separated text
pub fn write_tables<W: Write>(
    out: &mut W,
    tables: &ScanTables,
    which: DumpTable,
) -> io::Result<()> {
    if which.includes(DumpTable::ForensicPaths) {
        writeln!(out, "# forensic paths")?;
        for (offset, hash) in &tables.forensic_paths {
            writeln!(out, "{}\t{}", offset_string(Some(*offset)), hash)?;
        }
    }

    if which.includes(DumpTable::Hashes) {
        writeln!(out, "# hashes")?;
        for (hash, attributes) in &tables.hashes {
            let pairs: Vec<String> = attributes
                .id_offset_pairs
                .iter()
                .map(|p| format!("{}:{}", p.source_id, p.file_offset))
                .collect();
            writeln!(
                out,
                "{}\tcount={}\tlabel={}\tpairs={}",
                hash,
                attributes.count,
                attributes.has_label,
                pairs.join(",")
            )?;
        }
    }

    if which.includes(DumpTable::SourceDetails) {
        writeln!(out, "# source details")?;
        for detail in tables.source_details.values() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                detail.source_id,
                detail.repository_name,
                detail.filename,
                detail.filesize,
                detail.content_hash
            )?;
        }
    }

    if which.includes(DumpTable::SourcesOffsets) {
        writeln!(out, "# sources offsets")?;
        for (source_id, offsets) in tables.sources_offsets() {
            let offsets: Vec<String> = offsets.iter().map(u64::to_string).collect();
            writeln!(out, "{}\t{}", source_id, offsets.join(","))?;
        }
    }

    Ok(())
}

/// JSON document with validity, statistics and the selected tables
pub fn to_json(reader: &ScanReader, which: Option<DumpTable>) -> serde_json::Result<Value> {
    let mut document = Map::new();
    document.insert("scan_file".to_string(), json!(reader.source()));
    document.insert("is_valid".to_string(), json!(reader.is_valid()));
    document.insert("error_message".to_string(), json!(reader.error_message()));
    document.insert(
        "statistics".to_string(),
        serde_json::to_value(reader.statistics())?,
    );

    if let Some(which) = which {
        let tables = reader.tables();
        if which.includes(DumpTable::ForensicPaths) {
            document.insert(
                "forensic_paths".to_string(),
                serde_json::to_value(&tables.forensic_paths)?,
            );
        }
        if which.includes(DumpTable::Hashes) {
            document.insert("hashes".to_string(), serde_json::to_value(&tables.hashes)?);
        }
        if which.includes(DumpTable::SourceDetails) {
            document.insert(
                "source_details".to_string(),
                serde_json::to_value(&tables.source_details)?,
            );
        }
        if which.includes(DumpTable::SourcesOffsets) {
            document.insert(
                "sources_offsets".to_string(),
                serde_json::to_value(tables.sources_offsets())?,
            );
        }
    }

    Ok(Value::Object(document))
}
