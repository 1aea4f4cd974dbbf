// dqgate-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    #[error("Invalid check '{check}': {reason}")]
    #[diagnostic(
        code(dqgate::domain::invalid_check),
        help("Table names, column names and custom queries must be non-empty.")
    )]
    InvalidCheck { check: String, reason: String },

    #[error("Unknown failure policy '{0}'")]
    #[diagnostic(
        code(dqgate::domain::policy),
        help("Use 'fail_fast' or 'collect_all'.")
    )]
    UnknownPolicy(String),
}
