//! # pulse-cli
//!
//! Wiring for the `pulse` binary: argument parsing, pipeline stages, and
//! subcommand implementations. Kept as a library so the commands can be
//! exercised from integration tests.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod pipeline;
