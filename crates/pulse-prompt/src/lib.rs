//! # pulse-prompt
//!
//! Builds the `{system, user}` prompt pair sent to the report model.
//!
//! Two variants exist and the caller picks one explicitly:
//! [`compose_default`] for free-form reports, and [`compose_with_skill`]
//! when a skill pack dictates instructions, template, and rubric. Both
//! embed the KPI summary as pretty JSON and the compact task table.

#![deny(unsafe_code)]

pub mod composer;

pub use composer::{DEFAULT_REQUEST, compose_default, compose_with_skill, kpis_json};
