// dqgate-core/src/domain/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::check::CheckSpec;
use crate::domain::policy::FailurePolicy;
use crate::domain::scalar::Scalar;

/// A check whose query ran but returned the wrong value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckFailure {
    /// 1-based position in the submitted sequence.
    pub position: usize,
    pub spec: CheckSpec,
    pub expected: Scalar,
    pub actual: Scalar,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {}",
            self.spec.name(),
            self.expected,
            self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub policy: FailurePolicy,
    /// Checks handed to the runner.
    pub planned: usize,
    /// Checks actually executed and compared.
    pub total: usize,
    pub passed: Vec<String>,
    pub failures: Vec<CheckFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl QualityReport {
    pub fn start(planned: usize, policy: FailurePolicy) -> Self {
        Self {
            policy,
            planned,
            total: 0,
            passed: Vec::new(),
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_pass(&mut self, spec: &CheckSpec) {
        self.total += 1;
        self.passed.push(spec.name().to_string());
    }

    pub fn record_failure(&mut self, position: usize, spec: &CheckSpec, actual: Scalar) {
        self.total += 1;
        self.failures.push(CheckFailure {
            position,
            spec: spec.clone(),
            expected: spec.expected().clone(),
            actual,
        });
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Checks never evaluated because the run stopped early.
    pub fn skipped(&self) -> usize {
        self.planned.saturating_sub(self.total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_report_bookkeeping() {
        let ok = CheckSpec::table_not_empty("users").unwrap();
        let bad = CheckSpec::column_no_nulls("songs", "song_id").unwrap();

        let mut report = QualityReport::start(3, FailurePolicy::FailFast);
        assert!(report.is_success());

        report.record_pass(&ok);
        report.record_failure(2, &bad, Scalar::Int(1));
        let report = report.finish();

        assert_eq!(report.total, 2);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
        assert_eq!(report.passed, vec!["table_not_empty(users)".to_string()]);
        assert!(report.finished_at.is_some());

        let failure = &report.failures[0];
        assert_eq!(failure.position, 2);
        insta::assert_snapshot!(failure.to_string(), @"column_no_nulls(songs.song_id): expected 0, actual 1");
    }

    #[test]
    fn test_report_serializes_failures() {
        let bad = CheckSpec::custom("SELECT 42", 7).unwrap();
        let mut report = QualityReport::start(1, FailurePolicy::CollectAll);
        report.record_failure(1, &bad, Scalar::Int(42));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "collect_all");
        assert_eq!(json["failures"][0]["expected"], 7);
        assert_eq!(json["failures"][0]["actual"], 42);
        assert_eq!(json["failures"][0]["spec"]["kind"], "custom");
        assert_eq!(json["failures"][0]["spec"]["query"], "SELECT 42");
    }
}
