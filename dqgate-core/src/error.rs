// dqgate-core/src/error.rs

use crate::domain::error::DomainError;
use crate::domain::report::QualityReport;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum QualityError {
    // --- ERREURS DU DOMAINE (invalid checks, unknown policies) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, Engine setup) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- A check query could not be run; the run was aborted ---
    #[error(transparent)]
    Execution(#[from] Box<ExecutionError>),
}

impl From<std::io::Error> for QualityError {
    fn from(err: std::io::Error) -> Self {
        QualityError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<ExecutionError> for QualityError {
    fn from(err: ExecutionError) -> Self {
        QualityError::Execution(Box::new(err))
    }
}

/// The run stopped because the executor failed, not because the data is wrong.
///
/// `progress` holds everything evaluated before the failing call, so the
/// outcome of earlier checks survives the abort.
#[derive(Error, Debug, Diagnostic)]
#[error("Execution error at {location}: {source}")]
#[diagnostic(
    code(dqgate::execution),
    help("The query engine failed. This is an infrastructure problem, not a data-quality failure.")
)]
pub struct ExecutionError {
    pub location: String,
    /// 1-based position of the check being executed, `None` when the session never opened.
    pub position: Option<usize>,
    pub progress: QualityReport,
    #[source]
    pub source: InfrastructureError,
}

impl ExecutionError {
    pub fn checks_completed(&self) -> usize {
        self.progress.total
    }
}
