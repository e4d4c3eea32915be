//! Test execution engine.

use minprintf_core::{IntModel, Printf};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::{VerificationResult, VerificationSummary};

/// Bytes past the capacity that must come back untouched.
const GUARD_LEN: usize = 8;
const GUARD_BYTE: u8 = 0xA5;

/// Runs a fixture set through the engine and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Integer model the engine emulates.
    pub model: IntModel,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, model: IntModel) -> Self {
        Self {
            campaign: campaign.into(),
            model,
        }
    }

    /// Whether the set's expectations were captured under this runner's model.
    #[must_use]
    pub fn accepts(&self, fixture_set: &FixtureSet) -> bool {
        fixture_set.int_model.eq_ignore_ascii_case(self.model.name())
    }

    /// Run all fixtures in a set and return results.
    ///
    /// A set captured under a different integer model yields no results.
    #[must_use]
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        if !self.accepts(fixture_set) {
            return Vec::new();
        }
        let printf = Printf::with_int_model(self.model);
        fixture_set
            .cases
            .iter()
            .map(|case| execute_case(&printf, case))
            .collect()
    }

    /// Like [`TestRunner::run`], emitting one log line per case plus
    /// start and end events.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let model = self.model.name();
        if !self.accepts(fixture_set) {
            log.emit_entry(
                LogEntry::new("", LogLevel::Warn, "fixture_set_skipped")
                    .with_int_model(model)
                    .with_outcome(Outcome::Skip)
                    .with_details(serde_json::json!({
                        "campaign": self.campaign,
                        "family": fixture_set.family,
                        "captured_int_model": fixture_set.int_model,
                    })),
            )?;
            return Ok(Vec::new());
        }

        log.emit_entry(
            LogEntry::new("", LogLevel::Info, "fixture_set_start")
                .with_int_model(model)
                .with_details(serde_json::json!({
                    "campaign": self.campaign,
                    "family": fixture_set.family,
                    "cases": fixture_set.cases.len(),
                })),
        )?;

        let results = self.run(fixture_set);
        for (case, result) in fixture_set.cases.iter().zip(&results) {
            let entry = LogEntry::new(
                "",
                if result.passed { LogLevel::Info } else { LogLevel::Error },
                "case_verified",
            )
            .with_case(&result.case_name, &case.format, case.capacity)
            .with_int_model(model);
            let entry = if result.passed {
                entry.with_outcome(Outcome::Pass)
            } else {
                entry
                    .with_outcome(Outcome::Fail)
                    .with_comparison(&result.expected, &result.actual)
                    .with_details(serde_json::json!({
                        "expected_len": result.expected_len,
                        "actual_len": result.actual_len,
                        "diff": result.diff,
                    }))
            };
            log.emit_entry(entry)?;
        }

        let summary = VerificationSummary::from_results(results);
        log.emit_entry(
            LogEntry::new(
                "",
                if summary.all_passed() { LogLevel::Info } else { LogLevel::Error },
                "fixture_set_end",
            )
            .with_int_model(model)
            .with_details(serde_json::json!({
                "total": summary.total,
                "passed": summary.passed,
                "failed": summary.failed,
            })),
        )?;
        Ok(summary.results)
    }
}

fn execute_case(printf: &Printf, case: &FixtureCase) -> VerificationResult {
    let args = case.format_args();
    let capacity = case.capacity;
    let mut storage = vec![GUARD_BYTE; capacity + GUARD_LEN];
    let actual_len = printf.format_to_buffer(&mut storage[..capacity], &case.format, &args);

    let mut violations = Vec::new();
    let stored = if capacity == 0 {
        if storage.iter().any(|&b| b != GUARD_BYTE) {
            violations.push("zero-capacity destination was written".to_string());
        }
        0
    } else {
        let stored = actual_len.min(capacity - 1);
        if storage[stored] != 0 {
            violations.push(format!("missing terminator at offset {stored}"));
        }
        stored
    };
    if storage[capacity..].iter().any(|&b| b != GUARD_BYTE) {
        violations.push(format!("write past capacity {capacity}"));
    }
    if actual_len != case.expected_len {
        violations.push(format!(
            "return value {actual_len}, expected {}",
            case.expected_len
        ));
    }

    let actual = String::from_utf8_lossy(&storage[..stored]).into_owned();
    if actual != case.expected_output {
        violations.insert(0, diff::render_diff(&case.expected_output, &actual));
    }

    VerificationResult {
        case_name: case.name.clone(),
        clause: case.clause.clone(),
        passed: violations.is_empty(),
        expected: case.expected_output.clone(),
        actual,
        expected_len: case.expected_len,
        actual_len,
        diff: (!violations.is_empty()).then(|| violations.join("\n")),
    }
}
