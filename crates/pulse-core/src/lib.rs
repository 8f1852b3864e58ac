//! # pulse-core
//!
//! Shared types for the Pulse weekly-report pipeline.
//!
//! - [`cell::Cell`]: the tagged cell value read from an input table
//! - [`table::RawTable`] / [`table::CanonicalTable`]: tables before and after
//!   schema normalization
//! - [`table::Status`]: normalized task lifecycle state
//! - [`prompt::Prompt`]: the `{system, user}` pair handed to a model client
//! - [`logging`]: `tracing` subscriber setup

#![deny(unsafe_code)]

pub mod cell;
pub mod constants;
pub mod logging;
pub mod prompt;
pub mod table;

pub use cell::Cell;
pub use prompt::Prompt;
pub use table::{CanonicalField, CanonicalTable, RawTable, Status, TaskRecord};
