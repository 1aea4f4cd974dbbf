// dqgate-core/src/lib.rs

#![allow(missing_docs)]
// 1. Memory safety
#![deny(unsafe_code)]
// 2. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 3. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contracts for the query engine: one scalar per query, one session per run.
pub mod ports;

// 2. Domain (Cœur du métier)
// Checks, scalars, reports. Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, DataFusion, YAML config, atomic file writes.
pub mod infrastructure;

// 4. Application (Use Cases)
// The quality runner and the instrumented query wrapper.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use domain::{CheckKind, CheckSpec, FailurePolicy, QualityReport, Scalar};
pub use error::{ExecutionError, QualityError};
