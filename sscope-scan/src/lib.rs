//! sscope-scan library - hashdb scan output decoder
//!
//! Decodes the expanded identified blocks file written by a hashdb scan
//! into three lookup tables:
//! - forensic paths: media image offset → block hash
//! - hashes: block hash → sources known to contain it
//! - source details: source ID → repository, filename, size and digest
//!
//! ```no_run
//! use sscope_scan::ScanReader;
//!
//! let reader = ScanReader::open("identified_blocks_expanded.txt");
//! if !reader.is_valid() {
//!     eprintln!("{}", reader.error_message());
//! }
//! println!("{} hashes", reader.hashes().len());
//! ```

pub mod error;
pub mod fragment;
pub mod model;
pub mod reader;
pub mod report;
pub mod statistics;
pub mod tables;
pub mod tokenizer;

pub use crate::error::{FragmentError, ScanError};
pub use crate::fragment::{FragmentDecoder, FragmentLayout, SourceDetailPolicy};
pub use crate::model::{
    ForensicPaths, HashAttributes, Hashes, IdOffsetPair, SourceDetail, SourceDetails, SourceIds,
};
pub use crate::reader::{ReaderOptions, ReaderState, ScanReader};
pub use crate::statistics::ScanStatistics;
pub use crate::tables::{RecordOutcome, ScanTables, TableBuilder};
