//! Host-side tooling for platshim.
//!
//! This crate provides:
//! - Constants report: every exported constant for the build target, as JSON
//! - Probe: drives the wide-struct wrappers against a real directory
//! - Structured logging: the JSONL record contract and its validator

#![deny(unsafe_code)]

pub mod constants_report;
pub mod error;
pub mod probe;
pub mod structured_log;

pub use constants_report::ConstantsReport;
pub use error::HarnessError;
pub use probe::{ProbeReport, run_probe};
