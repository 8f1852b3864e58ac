//! # pulse-ingest
//!
//! Reads task tables and normalizes them into the canonical schema.
//!
//! - [`reader`]: CSV and spreadsheet readers producing a [`pulse_core::RawTable`]
//! - [`normalize`]: column mapping and per-cell normalization
//! - [`aliases`]: column and value synonym tables
//! - [`dates`]: permissive date parsing

#![deny(unsafe_code)]

pub mod aliases;
pub mod dates;
pub mod errors;
pub mod normalize;
pub mod reader;

pub use errors::{IngestError, Result};
pub use normalize::{ColumnMapping, map_columns, normalize};
pub use reader::{TableFormat, read_csv, read_spreadsheet, read_table};
