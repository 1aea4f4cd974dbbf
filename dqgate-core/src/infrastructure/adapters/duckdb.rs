// dqgate-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{Config, Connection, InterruptHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

// Imports Hexagonaux
use crate::domain::scalar::Scalar;
use crate::infrastructure::adapters::{SourceFormat, SourceTable};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::{ScalarExecutor, SessionFactory};

/// Opens one DuckDB connection per quality run.
#[derive(Debug, Clone)]
pub struct DuckDbEngine {
    db_path: String,
    sources: Vec<SourceTable>,
}

impl DuckDbEngine {
    pub fn new(db_path: &str) -> Self {
        Self {
            db_path: db_path.to_string(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceTable>) -> Self {
        self.sources = sources;
        self
    }

    pub fn connect(&self) -> Result<DuckDbSession, InfrastructureError> {
        let session = DuckDbSession::open(&self.db_path)?;
        for source in &self.sources {
            session.register_source(source)?;
        }
        Ok(session)
    }
}

#[async_trait]
impl SessionFactory for DuckDbEngine {
    async fn open_session(&self) -> Result<Box<dyn ScalarExecutor>, InfrastructureError> {
        info!(path = %self.db_path, "Opening DuckDB session");
        Ok(Box::new(self.connect()?))
    }
}

pub struct DuckDbSession {
    conn: Arc<Mutex<Connection>>,
    // Taken at open time: reaching it must not wait on the connection lock.
    interrupt: Arc<InterruptHandle>,
}

impl DuckDbSession {
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        let interrupt = conn.interrupt_handle();
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        })
    }

    /// Runs statements that return nothing (fixtures, DDL).
    pub fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        let conn = lock(&self.conn)?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Exposes a file as a view named after the source.
    pub fn register_source(&self, source: &SourceTable) -> Result<(), InfrastructureError> {
        let reader = match source.format {
            SourceFormat::Parquet => "read_parquet",
            SourceFormat::Csv => "read_csv_auto",
            SourceFormat::Json => "read_json_auto",
        };
        let query = format!(
            "CREATE OR REPLACE VIEW \"{}\" AS SELECT * FROM {}('{}')",
            source.name,
            reader,
            source.path_str()?
        );
        debug!("Registering source {}: {}", source.name, query);
        self.execute_batch(&query)
    }
}

#[async_trait]
impl ScalarExecutor for DuckDbSession {
    async fn execute_scalar(&self, query: &str) -> Result<Scalar, InfrastructureError> {
        let conn = self.conn.clone();
        let query = query.to_string();
        let cancelled = Arc::new(AtomicBool::new(false));
        let guard = InterruptOnDrop::arm(self.interrupt.clone(), cancelled.clone());

        // Blocking pool, so a caller-side deadline can still fire.
        let result = tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            if cancelled.load(Ordering::SeqCst) {
                return Err(InfrastructureError::Cancelled(
                    "dropped before it started".to_string(),
                ));
            }
            query_scalar(&conn, &query)
        })
        .await;
        guard.disarm();

        result.map_err(|e| InfrastructureError::Cancelled(format!("DuckDB task aborted: {}", e)))?
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// Interrupts the running statement if the query future is dropped before
/// the blocking task hands back its result (deadline, caller abort).
struct InterruptOnDrop {
    handle: Arc<InterruptHandle>,
    cancelled: Arc<AtomicBool>,
    armed: bool,
}

impl InterruptOnDrop {
    fn arm(handle: Arc<InterruptHandle>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            handle,
            cancelled,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        if self.armed {
            // Flag first: a task still waiting for the lock must not start the query.
            self.cancelled.store(true, Ordering::SeqCst);
            self.handle.interrupt();
            debug!("Interrupted an abandoned DuckDB query");
        }
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
    conn.lock()
        .map_err(|_| InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned")))
}

fn query_scalar(conn: &Connection, query: &str) -> Result<Scalar, InfrastructureError> {
    let mut stmt = conn.prepare(query)?;
    let mut rows = stmt.query([])?;
    let row = rows.next()?.ok_or(InfrastructureError::EmptyResult)?;
    let value: Value = row.get(0)?;
    to_scalar(value)
}

fn to_scalar(value: Value) -> Result<Scalar, InfrastructureError> {
    let overflow = |v: String| InfrastructureError::UnsupportedType(format!("{} overflows i64", v));
    let scalar = match value {
        Value::Null => Scalar::Null,
        Value::Boolean(b) => Scalar::Bool(b),
        Value::TinyInt(i) => Scalar::Int(i64::from(i)),
        Value::SmallInt(i) => Scalar::Int(i64::from(i)),
        Value::Int(i) => Scalar::Int(i64::from(i)),
        Value::BigInt(i) => Scalar::Int(i),
        Value::HugeInt(i) => Scalar::Int(i64::try_from(i).map_err(|_| overflow(i.to_string()))?),
        Value::UTinyInt(i) => Scalar::Int(i64::from(i)),
        Value::USmallInt(i) => Scalar::Int(i64::from(i)),
        Value::UInt(i) => Scalar::Int(i64::from(i)),
        Value::UBigInt(i) => Scalar::Int(i64::try_from(i).map_err(|_| overflow(i.to_string()))?),
        Value::Text(s) => Scalar::Text(s),
        other => return Err(InfrastructureError::UnsupportedType(format!("{:?}", other))),
    };
    Ok(scalar)
}
