//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot capture case '{case}': {reason}")]
    UnsupportedCapture { case: String, reason: String },
    #[error("invalid argument '{input}': {reason}")]
    InvalidArgument { input: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(PathBuf),
    #[error("{failed} of {total} fixture cases failed")]
    VerificationFailed { failed: usize, total: usize },
    #[error("{errors} schema violations in {lines} log lines")]
    InvalidLog { lines: usize, errors: usize },
}
