// dqgate-core/src/infrastructure/adapters/deadline.rs

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::domain::scalar::Scalar;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::{ScalarExecutor, SessionFactory};

/// Caps every query of a session. An elapsed deadline surfaces as
/// [`InfrastructureError::Cancelled`].
pub struct DeadlineExecutor {
    inner: Box<dyn ScalarExecutor>,
    deadline: Duration,
}

impl DeadlineExecutor {
    pub fn new(inner: Box<dyn ScalarExecutor>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl ScalarExecutor for DeadlineExecutor {
    async fn execute_scalar(&self, query: &str) -> Result<Scalar, InfrastructureError> {
        match tokio::time::timeout(self.deadline, self.inner.execute_scalar(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("⏱️ Query exceeded its {:?} deadline", self.deadline);
                Err(InfrastructureError::Cancelled(format!(
                    "deadline of {:?} exceeded",
                    self.deadline
                )))
            }
        }
    }

    fn engine_name(&self) -> &str {
        self.inner.engine_name()
    }
}

/// Wraps every session of `inner` in a [`DeadlineExecutor`].
pub struct DeadlineSessions {
    inner: Box<dyn SessionFactory>,
    deadline: Duration,
}

impl DeadlineSessions {
    pub fn new(inner: Box<dyn SessionFactory>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl SessionFactory for DeadlineSessions {
    async fn open_session(&self) -> Result<Box<dyn ScalarExecutor>, InfrastructureError> {
        let session = self.inner.open_session().await?;
        Ok(Box::new(DeadlineExecutor::new(session, self.deadline)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct SlowExecutor {
        delay: Duration,
    }

    #[async_trait]
    impl ScalarExecutor for SlowExecutor {
        async fn execute_scalar(&self, _query: &str) -> Result<Scalar, InfrastructureError> {
            tokio::time::sleep(self.delay).await;
            Ok(Scalar::Int(0))
        }

        fn engine_name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_query_within_deadline() {
        let executor = DeadlineExecutor::new(
            Box::new(SlowExecutor {
                delay: Duration::from_millis(1),
            }),
            Duration::from_secs(5),
        );
        assert_eq!(executor.execute_scalar("SELECT 0").await.unwrap(), Scalar::Int(0));
        assert_eq!(executor.engine_name(), "slow");
    }

    #[tokio::test]
    async fn test_elapsed_deadline_is_cancelled() {
        let executor = DeadlineExecutor::new(
            Box::new(SlowExecutor {
                delay: Duration::from_secs(5),
            }),
            Duration::from_millis(20),
        );
        let result = executor.execute_scalar("SELECT 0").await;
        assert!(matches!(result, Err(InfrastructureError::Cancelled(_))));
    }

    struct SlowSessions;

    #[async_trait]
    impl SessionFactory for SlowSessions {
        async fn open_session(&self) -> Result<Box<dyn ScalarExecutor>, InfrastructureError> {
            Ok(Box::new(SlowExecutor {
                delay: Duration::from_secs(5),
            }))
        }
    }

    #[tokio::test]
    async fn test_sessions_are_wrapped() {
        let sessions = DeadlineSessions::new(Box::new(SlowSessions), Duration::from_millis(20));
        let session = sessions.open_session().await.unwrap();
        assert_eq!(session.engine_name(), "slow");
        assert!(matches!(
            session.execute_scalar("SELECT 0").await,
            Err(InfrastructureError::Cancelled(_))
        ));
    }
}
