// dqgate-core/src/infrastructure/fs.rs

use crate::domain::report::QualityReport;
use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "run_report.json";

/// Write content to a file atomically using a temporary file.
///
/// The target is either fully written or left untouched.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Persists the report as `<target_dir>/run_report.json` and returns its path.
pub fn save_report(target_dir: &Path, report: &QualityReport) -> Result<PathBuf, InfrastructureError> {
    if !target_dir.exists() {
        std::fs::create_dir_all(target_dir)?;
    }
    let path = target_dir.join(REPORT_FILE);
    let content = serde_json::to_string_pretty(report)?;
    atomic_write(&path, content)?;
    info!(path = ?path, "Quality report saved");
    Ok(path)
}
