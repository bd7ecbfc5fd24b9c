//! Scan file reader
//!
//! `ScanReader` decodes a whole scan file in one synchronous pass when it is
//! constructed. It never fails to construct: fatal conditions are recorded in
//! its state and message, and the tables hold every record processed before
//! the failing line.
//!
//! ```text
//! Reading ──EOF──────────────▶ Done
//!    │
//!    └─open/read/JSON error──▶ Invalid
//! ```

use crate::error::ScanError;
use crate::fragment::{FragmentDecoder, FragmentLayout, SourceDetailPolicy};
use crate::model::{ForensicPaths, Hashes, SourceDetails};
use crate::statistics::ScanStatistics;
use crate::tables::{RecordOutcome, ScanTables, TableBuilder};
use crate::tokenizer::{tokenize_bytes, LineKind};
use sscope_common::config::ReaderConfig;
use sscope_common::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, warn};

/// Reader options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    pub layout: FragmentLayout,
    pub source_details: SourceDetailPolicy,
}

impl ReaderOptions {
    /// Validate the `[reader]` section of the TOML config
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        Ok(Self {
            layout: config.layout.parse().map_err(Error::Config)?,
            source_details: config.source_details.parse().map_err(Error::Config)?,
        })
    }

    fn decoder(&self) -> FragmentDecoder {
        FragmentDecoder::new(self.layout, self.source_details)
    }
}

/// Reader state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Consuming lines
    Reading,
    /// End of input reached; tables are complete
    Done,
    /// Halted on a fatal error; tables are partial
    Invalid,
}

/// Decodes one scan file into forensic path, hash and source detail tables
#[derive(Debug)]
pub struct ScanReader {
    source: String,
    state: ReaderState,
    builder: TableBuilder,
    statistics: ScanStatistics,
    error: Option<ScanError>,
}

impl ScanReader {
    /// Open and decode a scan file with default options
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with(path, ReaderOptions::default())
    }

    /// Open and decode a scan file
    pub fn open_with(path: impl AsRef<Path>, options: ReaderOptions) -> Self {
        let path = path.as_ref();
        let mut reader = Self::new(path.display().to_string(), options);

        match File::open(path) {
            Ok(file) => reader.consume(BufReader::new(file)),
            Err(source) => reader.halt(ScanError::FileOpen {
                path: path.to_path_buf(),
                source,
            }),
        }

        reader
    }

    /// Decode scan data from an already open stream
    ///
    /// `source` names the input in diagnostics.
    pub fn from_reader<R: BufRead>(input: R, source: &str, options: ReaderOptions) -> Self {
        let mut reader = Self::new(source.to_string(), options);
        reader.consume(input);
        reader
    }

    fn new(source: String, options: ReaderOptions) -> Self {
        Self {
            source,
            state: ReaderState::Reading,
            builder: TableBuilder::new(options.decoder()),
            statistics: ScanStatistics::default(),
            error: None,
        }
    }

    /// Consume the whole input; the stream is dropped on every exit path
    fn consume<R: BufRead>(&mut self, input: R) {
        debug!("Reading scan file '{}'", self.source);

        for (index, line) in input.split(b'\n').enumerate() {
            let line_number = index as u64 + 1;
            self.statistics.lines_read += 1;

            let result = line
                .map_err(|source| ScanError::Read {
                    line: line_number,
                    source,
                })
                .and_then(|line| self.process_line(line_number, &line));

            if let Err(err) = result {
                self.halt(err);
                return;
            }
        }

        self.state = ReaderState::Done;
        self.statistics.log_summary(&self.source, self.builder.tables());
    }

    fn process_line(
        &mut self,
        line_number: u64,
        line: &[u8],
    ) -> std::result::Result<(), ScanError> {
        let record = match tokenize_bytes(line) {
            LineKind::Blank => {
                self.statistics.blank_lines += 1;
                return Ok(());
            }
            LineKind::Comment => {
                self.statistics.comment_lines += 1;
                return Ok(());
            }
            LineKind::Malformed => {
                self.statistics.malformed_lines += 1;
                warn!(
                    "{}: '{}'",
                    ScanError::LineFormat { line: line_number },
                    String::from_utf8_lossy(line)
                );
                return Ok(());
            }
            LineKind::Undecodable => {
                self.statistics.malformed_lines += 1;
                warn!("{}", ScanError::LineEncoding { line: line_number });
                return Ok(());
            }
            LineKind::Record(record) => record,
        };

        match self.builder.apply(&record) {
            Ok(RecordOutcome::NewHash) => {
                self.statistics.records += 1;
            }
            Ok(RecordOutcome::KnownHash) => {
                self.statistics.records += 1;
                self.statistics.repeated_hashes += 1;
            }
            Ok(RecordOutcome::DuplicateOffset(offset)) => {
                self.statistics.duplicate_offsets += 1;
                warn!(
                    "{}",
                    ScanError::DuplicateOffset {
                        line: line_number,
                        offset
                    }
                );
            }
            Err(err) => return Err(ScanError::from_fragment(line_number, err)),
        }

        Ok(())
    }

    fn halt(&mut self, err: ScanError) {
        error!("Scan of '{}' halted: {}", self.source, err);
        self.state = ReaderState::Invalid;
        self.error = Some(err);
    }

    /// Name of the input, as given at construction
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// False once a fatal error has halted the pass
    pub fn is_valid(&self) -> bool {
        self.state != ReaderState::Invalid
    }

    /// Diagnostic for the fatal error, empty when valid
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// The fatal error, if any
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn statistics(&self) -> &ScanStatistics {
        &self.statistics
    }

    pub fn tables(&self) -> &ScanTables {
        self.builder.tables()
    }

    pub fn forensic_paths(&self) -> &ForensicPaths {
        &self.tables().forensic_paths
    }

    pub fn hashes(&self) -> &Hashes {
        &self.tables().hashes
    }

    pub fn source_details(&self) -> &SourceDetails {
        &self.tables().source_details
    }

    /// Take ownership of the tables
    pub fn into_tables(self) -> ScanTables {
        self.builder.into_tables()
    }
}
