// dqgate-core/src/infrastructure/adapters/datafusion.rs

use async_trait::async_trait;
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;
use tracing::{debug, info};

// Imports Hexagonaux
use crate::domain::scalar::Scalar;
use crate::infrastructure::adapters::{SourceFormat, SourceTable};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::{ScalarExecutor, SessionFactory};

/// Checks the data-lake output (Parquet tables, raw JSON logs) in process.
///
/// Each session gets its own `SessionContext` with every source registered.
#[derive(Debug, Clone, Default)]
pub struct DataFusionEngine {
    sources: Vec<SourceTable>,
}

impl DataFusionEngine {
    pub fn new(sources: Vec<SourceTable>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SessionFactory for DataFusionEngine {
    async fn open_session(&self) -> Result<Box<dyn ScalarExecutor>, InfrastructureError> {
        info!(sources = self.sources.len(), "Opening DataFusion session");
        let session = DataFusionSession::new();
        for source in &self.sources {
            session.register_source(source).await?;
        }
        Ok(Box::new(session))
    }
}

pub struct DataFusionSession {
    ctx: SessionContext,
}

impl Default for DataFusionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFusionSession {
    pub fn new() -> Self {
        Self {
            ctx: SessionContext::new(),
        }
    }

    pub async fn register_source(&self, source: &SourceTable) -> Result<(), InfrastructureError> {
        let path = source.path_str()?;
        let extension = source
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e));
        debug!("Registering {:?} source {} at {}", source.format, source.name, path);

        match source.format {
            SourceFormat::Parquet => {
                let mut options = ParquetReadOptions::default();
                if let Some(ext) = extension.as_deref() {
                    options.file_extension = ext;
                }
                self.ctx
                    .register_parquet(source.name.as_str(), path, options)
                    .await?
            }
            SourceFormat::Csv => {
                let mut options = CsvReadOptions::new();
                if let Some(ext) = extension.as_deref() {
                    options.file_extension = ext;
                }
                self.ctx
                    .register_csv(source.name.as_str(), path, options)
                    .await?
            }
            SourceFormat::Json => {
                let mut options = NdJsonReadOptions::default();
                if let Some(ext) = extension.as_deref() {
                    options.file_extension = ext;
                }
                self.ctx
                    .register_json(source.name.as_str(), path, options)
                    .await?
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ScalarExecutor for DataFusionSession {
    async fn execute_scalar(&self, query: &str) -> Result<Scalar, InfrastructureError> {
        let df = self.ctx.sql(query).await?;
        let batches = df.collect().await?;

        let batch = batches
            .iter()
            .find(|b| b.num_rows() > 0 && b.num_columns() > 0)
            .ok_or(InfrastructureError::EmptyResult)?;
        let value = ScalarValue::try_from_array(batch.column(0), 0)?;
        to_scalar(value)
    }

    fn engine_name(&self) -> &str {
        "datafusion"
    }
}

fn to_scalar(value: ScalarValue) -> Result<Scalar, InfrastructureError> {
    if value.is_null() {
        return Ok(Scalar::Null);
    }
    let overflow = |v: u64| InfrastructureError::UnsupportedType(format!("{} overflows i64", v));
    let scalar = match value {
        ScalarValue::Boolean(Some(b)) => Scalar::Bool(b),
        ScalarValue::Int8(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::Int16(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::Int32(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::Int64(Some(i)) => Scalar::Int(i),
        ScalarValue::UInt8(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::UInt16(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::UInt32(Some(i)) => Scalar::Int(i64::from(i)),
        ScalarValue::UInt64(Some(i)) => Scalar::Int(i64::try_from(i).map_err(|_| overflow(i))?),
        ScalarValue::Utf8(Some(s))
        | ScalarValue::LargeUtf8(Some(s))
        | ScalarValue::Utf8View(Some(s)) => Scalar::Text(s),
        other => {
            return Err(InfrastructureError::UnsupportedType(
                other.data_type().to_string(),
            ));
        }
    };
    Ok(scalar)
}
