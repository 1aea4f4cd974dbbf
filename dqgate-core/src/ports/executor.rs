// dqgate-core/src/ports/executor.rs

// What the runner needs from a query engine, without knowing which engine it is.

use crate::domain::scalar::Scalar;
use crate::infrastructure::error::InfrastructureError;
use async_trait::async_trait;

/// One open session on a query engine.
#[async_trait]
pub trait ScalarExecutor: Send + Sync {
    /// Runs `query` and returns the single value of its single row.
    async fn execute_scalar(&self, query: &str) -> Result<Scalar, InfrastructureError>;

    fn engine_name(&self) -> &str;
}

/// Hands out a session scoped to one quality run.
///
/// The session is released when the returned box is dropped.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn ScalarExecutor>, InfrastructureError>;
}
