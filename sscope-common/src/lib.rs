//! # SectorScope Common Library
//!
//! Shared code for the SectorScope scan tooling including:
//! - Error types
//! - Bootstrap configuration loading and scan file resolution
//! - Tracing subscriber initialization
//! - Forensic path parsing and formatting

pub mod config;
pub mod error;
pub mod forensic_path;
pub mod logging;

pub use error::{Error, Result};
