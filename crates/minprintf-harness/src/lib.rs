//! Compliance harness for minprintf.
//!
//! This crate provides:
//! - Fixture capture: record host libc `snprintf` output as JSON reference data
//! - Fixture verify: run the engine against captured fixtures under an integer model
//! - Structured logging: JSONL records per verified case, plus a schema validator
//! - Report generation: markdown and JSON reports fingerprinted with SHA-256

#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
