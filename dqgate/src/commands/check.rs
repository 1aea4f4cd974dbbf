// dqgate/src/commands/check.rs
//
// USE CASE: Run the quality gate. Plays the orchestrator role: loads the
// configuration, builds the checks, and decides the exit status.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use comfy_table::Table;
use dqgate_core::application::QualityRunner;
use dqgate_core::domain::{CheckSpec, FailurePolicy, QualityReport};
use dqgate_core::error::QualityError;
use dqgate_core::infrastructure::adapters::deadline::DeadlineSessions;
use dqgate_core::infrastructure::config::load_project_config;
use dqgate_core::infrastructure::fs::save_report;
use dqgate_core::ports::SessionFactory;

pub const EXIT_CHECK_FAILED: i32 = 1;
pub const EXIT_EXECUTION_ERROR: i32 = 2;

pub async fn execute(
    project_dir: PathBuf,
    collect_all: bool,
    timeout_secs: Option<u64>,
    no_report: bool,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (explicit phase, nothing is built before it)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load quality gate configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (engine: {:?})", config.name, config.engine);

    let checks = config
        .build_checks()
        .context("Invalid check in configuration")?;
    if checks.is_empty() {
        println!("ℹ️  No checks configured, nothing to do.");
        return Ok(());
    }

    let policy = if collect_all {
        FailurePolicy::CollectAll
    } else {
        config.policy
    };
    let runner = QualityRunner::new(policy);
    println!("📝 {} checks planned (policy: {})", checks.len(), runner.policy());

    // B. Instantiate the session factory for the configured engine
    let mut sessions: Box<dyn SessionFactory> = config
        .session_factory(&project_dir)
        .context("Failed to prepare the query engine")?;
    if let Some(secs) = timeout_secs {
        println!("   ⏱️  Query deadline: {}s", secs);
        sessions = Box::new(DeadlineSessions::new(sessions, Duration::from_secs(secs)));
    }

    // C. Run
    let target_dir = config.target_dir(&project_dir);

    match runner.run_in_session(&checks, sessions.as_ref()).await {
        Ok(report) => {
            print_report(&checks, &report, None);
            persist(&target_dir, &report, no_report)?;

            if report.is_success() {
                println!(
                    "\n✨ SUCCESS! {} checks passed in {:.2?}",
                    report.total,
                    start.elapsed()
                );
            } else {
                eprintln!("\n❌ FAILURE. {} check(s) failed:", report.failures.len());
                for failure in &report.failures {
                    eprintln!("   ➜ #{} {}", failure.position, failure);
                }
                std::process::exit(EXIT_CHECK_FAILED);
            }
        }
        Err(QualityError::Execution(err)) => {
            print_report(&checks, &err.progress, err.position);
            persist(&target_dir, &err.progress, no_report)?;
            eprintln!("\n💥 EXECUTION ERROR: {}", err);
            eprintln!(
                "   {} of {} checks completed before the engine failed.",
                err.checks_completed(),
                err.progress.planned
            );
            std::process::exit(EXIT_EXECUTION_ERROR);
        }
        Err(other) => return Err(other.into()),
    }

    Ok(())
}

fn persist(target_dir: &Path, report: &QualityReport, no_report: bool) -> anyhow::Result<()> {
    if no_report {
        return Ok(());
    }
    let path = save_report(target_dir, report)
        .with_context(|| format!("Failed to write report into {:?}", target_dir))?;
    println!("📄 Report saved to {}", path.display());
    Ok(())
}

fn print_report(checks: &[CheckSpec], report: &QualityReport, errored: Option<usize>) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Check", "Expected", "Actual", "Status"]);

    for (index, check) in checks.iter().enumerate() {
        let position = index + 1;
        let (actual, status) = row_outcome(check, report, errored, position);
        table.add_row(vec![
            position.to_string(),
            check.name().to_string(),
            check.expected().to_string(),
            actual,
            status.to_string(),
        ]);
    }

    println!("{table}");
}

/// Actual value and status label of the check at `position` (1-based).
fn row_outcome(
    check: &CheckSpec,
    report: &QualityReport,
    errored: Option<usize>,
    position: usize,
) -> (String, &'static str) {
    if errored == Some(position) {
        return ("-".to_string(), "💥 ERROR");
    }
    match report.failures.iter().find(|f| f.position == position) {
        Some(f) => (f.actual.to_string(), "❌ FAIL"),
        None if position <= report.total => (check.expected().to_string(), "✅ PASS"),
        None => ("-".to_string(), "⏭️  SKIPPED"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dqgate_core::domain::Scalar;

    fn three_checks() -> Vec<CheckSpec> {
        vec![
            CheckSpec::table_not_empty("users").unwrap(),
            CheckSpec::table_not_empty("staging_events").unwrap(),
            CheckSpec::custom("SELECT 42", 7).unwrap(),
        ]
    }

    #[test]
    fn test_errored_check_is_not_reported_as_skipped() {
        let checks = three_checks();
        let mut progress = QualityReport::start(3, FailurePolicy::FailFast);
        progress.record_pass(&checks[0]);

        let labels: Vec<&str> = (1..=3)
            .map(|p| row_outcome(&checks[p - 1], &progress, Some(2), p).1)
            .collect();
        assert_eq!(labels, vec!["✅ PASS", "💥 ERROR", "⏭️  SKIPPED"]);
    }

    #[test]
    fn test_failure_shows_actual_value() {
        let checks = three_checks();
        let mut report = QualityReport::start(3, FailurePolicy::CollectAll);
        report.record_pass(&checks[0]);
        report.record_pass(&checks[1]);
        report.record_failure(3, &checks[2], Scalar::Int(42));

        let (actual, status) = row_outcome(&checks[2], &report, None, 3);
        assert_eq!(actual, "42");
        assert_eq!(status, "❌ FAIL");
    }
}
