// dqgate-core/src/infrastructure/adapters/mod.rs

pub mod datafusion;
pub mod deadline;
pub mod duckdb;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infrastructure::error::InfrastructureError;

/// File layout of a registered source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Parquet,
    Csv,
    /// Newline-delimited JSON (the raw song and log datasets).
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, InfrastructureError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("parquet") => Ok(SourceFormat::Parquet),
            Some("csv") => Ok(SourceFormat::Csv),
            Some("json") | Some("ndjson") | Some("jsonl") => Ok(SourceFormat::Json),
            _ => Err(InfrastructureError::ConfigError(format!(
                "Cannot infer source format from {:?}, set 'format' explicitly",
                path
            ))),
        }
    }
}

/// A table the session exposes before any check runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub name: String,
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl SourceTable {
    pub fn path_str(&self) -> Result<&str, InfrastructureError> {
        self.path.to_str().ok_or_else(|| {
            InfrastructureError::ConfigError(format!(
                "Invalid path for source {}: {:?}",
                self.name, self.path
            ))
        })
    }
}
