// dqgate-core/src/domain/mod.rs

pub mod check;
pub mod error;
pub mod policy;
pub mod registry;
pub mod report;
pub mod scalar;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use check::{CheckKind, CheckSpec};
pub use error::DomainError;
pub use policy::FailurePolicy;
pub use registry::star_schema_suite;
pub use report::{CheckFailure, QualityReport};
pub use scalar::Scalar;
