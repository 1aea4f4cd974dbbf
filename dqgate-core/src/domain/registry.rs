// dqgate-core/src/domain/registry.rs

use crate::domain::check::CheckSpec;
use crate::domain::error::DomainError;

/// Tables of the Sparkify star schema (one fact, four dimensions).
pub const STAR_SCHEMA_TABLES: [&str; 5] = ["songplays", "users", "songs", "artists", "time"];

/// Dimension keys that must never be NULL once the dimensions are loaded.
pub const STAR_SCHEMA_KEYS: [(&str, &str); 3] = [
    ("users", "user_id"),
    ("songs", "song_id"),
    ("artists", "artist_id"),
];

/// Gate run after the fact and dimension loads: every table is populated
/// and every dimension key is present.
pub fn star_schema_suite() -> Result<Vec<CheckSpec>, DomainError> {
    let mut checks = Vec::with_capacity(STAR_SCHEMA_TABLES.len() + STAR_SCHEMA_KEYS.len());
    for table in STAR_SCHEMA_TABLES {
        checks.push(CheckSpec::table_not_empty(table)?);
    }
    for (table, column) in STAR_SCHEMA_KEYS {
        checks.push(CheckSpec::column_no_nulls(table, column)?);
    }
    Ok(checks)
}
