//! CLI entrypoint for the minprintf compliance harness.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use minprintf_core::{IntModel, IoStream, Printf};
use minprintf_harness::capture::{self, HostLibc};
use minprintf_harness::structured_log::{self, LogEmitter, LogLevel};
use minprintf_harness::{
    ConformanceReport, FixtureArg, FixtureSet, HarnessConfig, HarnessError, TestRunner,
    VerificationSummary,
};

/// Compliance tooling for minprintf.
#[derive(Debug, Parser)]
#[command(name = "minprintf-harness")]
#[command(about = "Compliance harness for the minprintf formatting engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Capture host libc snprintf behavior as a fixture file.
    Capture {
        /// Output directory for fixture JSON files.
        #[arg(long)]
        output: PathBuf,
        /// Integer model (defaults to MINPRINTF_INT_MODEL, then native).
        #[arg(long)]
        int_model: Option<String>,
        /// Fixed capture timestamp for reproducible fixtures.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Verify the engine against captured fixtures.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown); a JSON report is written beside it.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
        /// Integer model (defaults to MINPRINTF_INT_MODEL, then native).
        #[arg(long)]
        int_model: Option<String>,
        /// JSONL log path (defaults to MINPRINTF_LOG).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format a string with typed arguments and print it to stdout.
    Render {
        /// Format string. `\n`, `\r`, `\t` and `\\` are unescaped first.
        format: String,
        /// Arguments as `<type>:<value>`, e.g. `i32:-5`, `s:hello`, `f64:3.5`.
        args: Vec<FixtureArg>,
        /// Integer model (defaults to MINPRINTF_INT_MODEL, then native).
        #[arg(long)]
        int_model: Option<String>,
    },
    /// Validate a structured JSONL log.
    ValidateLog {
        /// JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), HarnessError> {
    let cli = Cli::parse();
    let env = HarnessConfig::from_env();

    match cli.command {
        Command::Capture {
            output,
            int_model,
            timestamp,
        } => {
            let config = env.with_overrides(int_model.as_deref(), None);
            let model = config.int_model;
            if model != IntModel::native() {
                return Err(HarnessError::InvalidConfig(format!(
                    "host capture needs the native integer model ({}), got {}",
                    IntModel::native().name(),
                    model.name()
                )));
            }
            eprintln!("Capturing {} fixtures to {}", capture::PRINTF_FAMILY, output.display());
            std::fs::create_dir_all(&output)?;
            let captured_at = timestamp.unwrap_or_else(structured_log::now_utc);
            let set = capture::capture_set(
                &HostLibc,
                model,
                &capture::compliance_matrix(model),
                &captured_at,
            )?;
            let path = output.join(format!("printf_{}.json", model.name()));
            std::fs::write(&path, set.to_json()?)?;
            eprintln!("Wrote {} cases to {}", set.cases.len(), path.display());
        }
        Command::Verify {
            fixture,
            report,
            timestamp,
            int_model,
            log,
        } => {
            let config = env.with_overrides(int_model.as_deref(), log);
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let fixture_sets = load_fixture_sets(&fixture)?;

            let run_id = format!("verify-{}", config.int_model.name());
            let mut emitter = match &config.log_path {
                Some(path) => Some(LogEmitter::to_file(path, &run_id)?),
                None => None,
            };
            let runner = TestRunner::new("fixture-verify", config.int_model);
            let mut results = Vec::new();
            for set in &fixture_sets {
                if !runner.accepts(set) {
                    eprintln!(
                        "Skipping {} set captured under {}",
                        set.family, set.int_model
                    );
                }
                match emitter.as_mut() {
                    Some(emitter) => results.extend(runner.run_logged(set, emitter)?),
                    None => results.extend(runner.run(set)),
                }
            }
            if let Some(emitter) = emitter.as_mut() {
                emitter.flush()?;
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("minprintf Compliance Report"),
                int_model: config.int_model.name().to_string(),
                timestamp: timestamp.unwrap_or_else(structured_log::now_utc),
                fixture_sha256: minprintf_harness::report::fixture_fingerprint(&fixture_sets),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(report_path.with_extension("json"), report_doc.to_json())?;
            }

            if report_doc.summary.total == 0 {
                return Err(HarnessError::InvalidConfig(format!(
                    "no fixture set matches integer model {}",
                    config.int_model.name()
                )));
            }
            if !report_doc.summary.all_passed() {
                return Err(HarnessError::VerificationFailed {
                    failed: report_doc.summary.failed,
                    total: report_doc.summary.total,
                });
            }
        }
        Command::Render {
            format,
            args,
            int_model,
        } => {
            let config = env.with_overrides(int_model.as_deref(), None);
            let format = unescape(&format);
            let args: Vec<_> = args.iter().map(FixtureArg::to_format_arg).collect();
            let stdout = std::io::stdout();
            let mut out = IoStream(stdout.lock());
            Printf::with_int_model(config.int_model).format_to_stream(&mut out, &format, &args)?;
            out.0.flush()?;
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = structured_log::validate_log_file(&log)?;
            for error in &errors {
                eprintln!("{error}");
            }
            if !errors.is_empty() {
                return Err(HarnessError::InvalidLog {
                    lines,
                    errors: errors.len(),
                });
            }
            let mut stdout = LogEmitter::to_stdout("validate-log");
            stdout.emit(LogLevel::Info, "log_valid")?;
            eprintln!("{} log lines valid in {}", lines, log.display());
        }
    }

    Ok(())
}

fn load_fixture_sets(dir: &Path) -> Result<Vec<FixtureSet>, HarnessError> {
    let mut fixture_paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    fixture_paths.sort();

    let mut fixture_sets = Vec::new();
    for path in fixture_paths {
        match FixtureSet::from_file(&path) {
            Ok(set) => fixture_sets.push(set),
            Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
        }
    }
    if fixture_sets.is_empty() {
        return Err(HarnessError::NoFixtures(dir.to_path_buf()));
    }
    Ok(fixture_sets)
}

/// Shell-friendly escapes: `\n`, `\r`, `\t`, `\\`. Anything else is kept.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
