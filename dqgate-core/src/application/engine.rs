// dqgate-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::scalar::Scalar;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::ScalarExecutor;

/// Exécute une requête scalaire avec instrumentation (Logs + Timing).
/// Every check query and every ad-hoc query goes through here.
#[instrument(skip(executor), fields(engine = executor.engine_name(), query.len = query.len()))]
pub async fn execute_scalar(
    executor: &dyn ScalarExecutor,
    query: &str,
) -> Result<Scalar, InfrastructureError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    let result = executor.execute_scalar(query).await;
    let duration = start.elapsed();

    match result {
        Ok(value) => {
            debug!("✅ Query returned {} in {:.2?}", value, duration);
            Ok(value)
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
