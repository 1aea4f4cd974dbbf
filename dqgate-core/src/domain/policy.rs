// dqgate-core/src/domain/policy.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// What the runner does after a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing check.
    #[default]
    FailFast,
    /// Evaluate every check and report all failures.
    CollectAll,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::FailFast => f.write_str("fail_fast"),
            FailurePolicy::CollectAll => f.write_str("collect_all"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(FailurePolicy::FailFast),
            "collect_all" => Ok(FailurePolicy::CollectAll),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("fail_fast".parse::<FailurePolicy>().unwrap(), FailurePolicy::FailFast);
        assert_eq!("Collect-All".parse::<FailurePolicy>().unwrap(), FailurePolicy::CollectAll);
        assert_eq!(
            "retry".parse::<FailurePolicy>(),
            Err(DomainError::UnknownPolicy("retry".into()))
        );
    }

    #[test]
    fn test_default_is_fail_fast() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::FailFast);
        assert_eq!(FailurePolicy::CollectAll.to_string(), "collect_all");
    }
}
