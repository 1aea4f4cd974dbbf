// dqgate-core/src/application/runner.rs

use tracing::{error, info, instrument, warn};

use crate::application::engine::execute_scalar;
use crate::domain::check::CheckSpec;
use crate::domain::policy::FailurePolicy;
use crate::domain::report::QualityReport;
use crate::error::{ExecutionError, QualityError};
use crate::ports::executor::{ScalarExecutor, SessionFactory};

/// Evaluates checks one at a time, in the order given.
///
/// A check whose value does not match is recorded in the report. An executor
/// error aborts the run with [`ExecutionError`] carrying the partial report.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityRunner {
    policy: FailurePolicy,
}

impl QualityRunner {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    #[instrument(skip_all, fields(checks = checks.len(), policy = %self.policy))]
    pub async fn run(
        &self,
        checks: &[CheckSpec],
        executor: &dyn ScalarExecutor,
    ) -> Result<QualityReport, QualityError> {
        let mut report = QualityReport::start(checks.len(), self.policy);

        for (index, check) in checks.iter().enumerate() {
            let position = index + 1;
            info!(
                kind = %check.kind(),
                "🧪 [{}/{}] {}",
                position,
                checks.len(),
                check.name()
            );

            let actual = match execute_scalar(executor, check.query()).await {
                Ok(value) => value,
                Err(source) => {
                    error!("💥 {} could not be executed: {}", check.name(), source);
                    return Err(ExecutionError {
                        location: format!(
                            "check {}/{} '{}'",
                            position,
                            checks.len(),
                            check.name()
                        ),
                        position: Some(position),
                        progress: report.finish(),
                        source,
                    }
                    .into());
                }
            };

            if check.is_satisfied_by(&actual) {
                report.record_pass(check);
                continue;
            }

            warn!(
                expected_type = check.expected().type_name(),
                actual_type = actual.type_name(),
                "❌ {}: expected {}, actual {}",
                check.name(),
                check.expected(),
                actual
            );
            report.record_failure(position, check, actual);

            if self.policy == FailurePolicy::FailFast {
                break;
            }
        }

        let report = report.finish();
        info!(
            "Quality run finished: {} evaluated, {} failed, {} skipped",
            report.total,
            report.failures.len(),
            report.skipped()
        );
        Ok(report)
    }

    /// Opens one session, runs every check on it, and releases it on every exit path.
    pub async fn run_in_session(
        &self,
        checks: &[CheckSpec],
        sessions: &dyn SessionFactory,
    ) -> Result<QualityReport, QualityError> {
        let session = match sessions.open_session().await {
            Ok(session) => session,
            Err(source) => {
                error!("💥 Could not open an executor session: {}", source);
                return Err(ExecutionError {
                    location: "session open".to_string(),
                    position: None,
                    progress: QualityReport::start(checks.len(), self.policy).finish(),
                    source,
                }
                .into());
            }
        };
        info!("🔌 Session opened on {}", session.engine_name());

        let result = self.run(checks, session.as_ref()).await;
        drop(session);
        result
    }
}
