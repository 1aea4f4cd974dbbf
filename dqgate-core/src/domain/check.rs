// dqgate-core/src/domain/check.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::scalar::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    TableNotEmpty,
    ColumnNoNulls,
    Custom,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckKind::TableNotEmpty => "table_not_empty",
            CheckKind::ColumnNoNulls => "column_no_nulls",
            CheckKind::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// One data-quality assertion: `query` must return exactly one scalar equal to `expected`.
///
/// Built-in checks count violating rows and always expect `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSpec {
    kind: CheckKind,
    name: String,
    query: String,
    expected: Scalar,
}

impl CheckSpec {
    /// Passes when `table` holds at least one row.
    ///
    /// The query yields `1` for an empty table and `0` otherwise.
    pub fn table_not_empty(table: &str) -> Result<Self, DomainError> {
        let table = require_identifier(table, "table_not_empty", "table name")?;
        Ok(Self {
            kind: CheckKind::TableNotEmpty,
            name: format!("table_not_empty({})", table),
            query: format!(
                "SELECT CASE WHEN COUNT(*) = 0 THEN 1 ELSE 0 END FROM {}",
                table
            ),
            expected: Scalar::Int(0),
        })
    }

    /// Passes when no row of `table` has a NULL `column`.
    pub fn column_no_nulls(table: &str, column: &str) -> Result<Self, DomainError> {
        let table = require_identifier(table, "column_no_nulls", "table name")?;
        let column = require_identifier(column, "column_no_nulls", "column name")?;
        Ok(Self {
            kind: CheckKind::ColumnNoNulls,
            name: format!("column_no_nulls({}.{})", table, column),
            query: format!("SELECT COUNT(*) FROM {} WHERE {} IS NULL", table, column),
            expected: Scalar::Int(0),
        })
    }

    /// Caller-supplied query and expectation, used verbatim.
    pub fn custom(query: &str, expected: impl Into<Scalar>) -> Result<Self, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::InvalidCheck {
                check: "custom".into(),
                reason: "query is empty".into(),
            });
        }
        let summary = query.trim().lines().next().unwrap_or_default().trim();
        Ok(Self {
            kind: CheckKind::Custom,
            name: format!("custom({})", summary),
            query: query.to_string(),
            expected: expected.into(),
        })
    }

    /// Renames the check in reports. Blank names are ignored.
    pub fn named(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.name = name.trim().to_string();
        }
        self
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn expected(&self) -> &Scalar {
        &self.expected
    }

    pub fn is_satisfied_by(&self, actual: &Scalar) -> bool {
        &self.expected == actual
    }
}

fn require_identifier<'a>(
    value: &'a str,
    check: &str,
    what: &str,
) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidCheck {
            check: check.to_string(),
            reason: format!("{} is empty", what),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_not_empty_counts_violations() {
        let check = CheckSpec::table_not_empty("users").unwrap();
        assert_eq!(check.kind(), CheckKind::TableNotEmpty);
        assert_eq!(check.name(), "table_not_empty(users)");
        assert_eq!(
            check.query(),
            "SELECT CASE WHEN COUNT(*) = 0 THEN 1 ELSE 0 END FROM users"
        );
        assert_eq!(check.expected(), &Scalar::Int(0));
        assert!(check.is_satisfied_by(&Scalar::Int(0)));
        assert!(!check.is_satisfied_by(&Scalar::Int(1)));
    }

    #[test]
    fn test_column_no_nulls_query() {
        let check = CheckSpec::column_no_nulls("songs", "song_id").unwrap();
        assert_eq!(check.name(), "column_no_nulls(songs.song_id)");
        assert_eq!(
            check.query(),
            "SELECT COUNT(*) FROM songs WHERE song_id IS NULL"
        );
        assert_eq!(check.expected(), &Scalar::Int(0));
    }

    #[test]
    fn test_custom_is_verbatim() {
        let query = "SELECT COUNT(*)\nFROM songplays\nWHERE start_time IS NULL";
        let check = CheckSpec::custom(query, 0).unwrap();
        assert_eq!(check.kind(), CheckKind::Custom);
        assert_eq!(check.query(), query);
        assert_eq!(check.name(), "custom(SELECT COUNT(*))");

        let named = CheckSpec::custom("SELECT true", true)
            .unwrap()
            .named("level_is_set");
        assert_eq!(named.name(), "level_is_set");
        assert_eq!(named.expected(), &Scalar::Bool(true));
    }

    #[test]
    fn test_blank_identifiers_are_rejected() {
        assert!(matches!(
            CheckSpec::table_not_empty("  "),
            Err(DomainError::InvalidCheck { .. })
        ));
        assert!(CheckSpec::column_no_nulls("users", "").is_err());
        assert!(CheckSpec::column_no_nulls("", "user_id").is_err());
        assert!(CheckSpec::custom("\n", 0).is_err());
    }

    #[test]
    fn test_identifiers_are_trimmed() {
        let check = CheckSpec::column_no_nulls(" users ", " user_id").unwrap();
        assert_eq!(check.name(), "column_no_nulls(users.user_id)");
    }
}
