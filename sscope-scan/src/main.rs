//! sscope-scan - hashdb scan output decoder
//!
//! Decodes a bulk_extractor `identified_blocks_expanded.txt` file and prints
//! scan statistics, optionally followed by a dump of the decoded tables.
//! Exits non-zero when the file could not be fully decoded; whatever was
//! decoded before the failure is still printed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sscope_common::config::{load_config, resolve_scan_file};
use sscope_common::logging::init_tracing;
use sscope_scan::report::{to_json, write_summary, write_tables, DumpTable};
use sscope_scan::{ReaderOptions, ScanReader};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for sscope-scan
#[derive(Parser, Debug)]
#[command(name = "sscope-scan")]
#[command(about = "Decode hashdb scan output into forensic path, hash and source tables")]
#[command(version)]
struct Args {
    /// Scan file to decode
    scan_file: Option<PathBuf>,

    /// bulk_extractor output directory containing identified_blocks_expanded.txt
    #[arg(long, conflicts_with = "scan_file")]
    be_dir: Option<PathBuf>,

    /// TOML config file (default: $SSCOPE_CONFIG, then the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Dump decoded tables after the statistics
    #[arg(long, value_enum)]
    dump: Option<DumpTable>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("Failed to load config")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!("Starting sscope-scan v{}", env!("CARGO_PKG_VERSION"));

    let scan_file = resolve_scan_file(args.scan_file.as_deref(), args.be_dir.as_deref(), &config)?;
    let options = ReaderOptions::from_config(&config.reader)?;
    info!(
        "Scan file: {} (layout {}, source details {})",
        scan_file.display(),
        options.layout,
        options.source_details
    );

    let reader = ScanReader::open_with(&scan_file, options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let document = to_json(&reader, args.dump)?;
        serde_json::to_writer_pretty(&mut out, &document)?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, &reader)?;
        if let Some(which) = args.dump {
            write_tables(&mut out, reader.tables(), which)?;
        }
    }
    out.flush()?;

    if !reader.is_valid() {
        bail!("{}", reader.error_message());
    }

    Ok(())
}
