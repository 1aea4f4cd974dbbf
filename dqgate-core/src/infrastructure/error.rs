// dqgate-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DataFusion Engine Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::database::datafusion),
        help("An error occurred while planning or executing the query.")
    )]
    DataFusion(#[from] datafusion::error::DataFusionError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Query returned no rows, expected exactly one scalar")]
    #[diagnostic(code(dqgate::infra::empty_result))]
    EmptyResult,

    #[error("Unsupported scalar type: {0}")]
    #[diagnostic(
        code(dqgate::infra::unsupported_type),
        help("Check queries must return an integer, a boolean, a string or NULL.")
    )]
    UnsupportedType(String),

    #[error("Query cancelled: {0}")]
    #[diagnostic(code(dqgate::infra::cancelled))]
    Cancelled(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dqgate::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(dqgate::infra::json))]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(dqgate::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(dqgate::infra::config_missing))]
    ConfigNotFound(String),
}

// Shortcuts for `?` on engine calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<datafusion::error::DataFusionError> for InfrastructureError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        InfrastructureError::Database(DatabaseError::DataFusion(err))
    }
}
