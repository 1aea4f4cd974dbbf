// dqgate-core/src/application/mod.rs

pub mod engine;
pub mod runner;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use dqgate_core::application::{QualityRunner, execute_scalar};`

pub use engine::execute_scalar;
pub use runner::QualityRunner;
