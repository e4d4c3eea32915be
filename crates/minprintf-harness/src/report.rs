//! Report generation for compliance results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::fixtures::FixtureSet;
use crate::verify::VerificationSummary;

/// A compliance report over one or more fixture sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Integer model the engine ran under.
    pub int_model: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// SHA-256 over the verified fixture sets; see [`fixture_fingerprint`].
    pub fixture_sha256: String,
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Integer model: {}\n", self.int_model));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Fixtures SHA-256: {}\n", self.fixture_sha256));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Clause | Status |\n");
        out.push_str("|------|--------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("| {} | {} | {} |\n", r.case_name, r.clause, status));
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n```\n", r.case_name));
                out.push_str(r.diff.as_deref().unwrap_or("[no diff]"));
                out.push_str("\n```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// SHA-256 over the canonical JSON of each set, in order.
///
/// Ties a report to the exact expectations it was checked against.
#[must_use]
pub fn fixture_fingerprint(sets: &[FixtureSet]) -> String {
    let mut hasher = Sha256::new();
    for set in sets {
        // Serializing plain data into a Vec cannot fail.
        let bytes = serde_json::to_vec(set).unwrap_or_default();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    hex_lower(&hasher.finalize())
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
