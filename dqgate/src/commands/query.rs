// dqgate/src/commands/query.rs
//
// USE CASE: Execute an ad-hoc scalar query through the same session path as the checks.

use std::path::PathBuf;

use anyhow::Context;
use dqgate_core::application::execute_scalar;
use dqgate_core::infrastructure::config::load_project_config;

pub async fn execute(query: String, project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load quality gate configuration from {:?}",
            project_dir
        )
    })?;

    let sessions = config.session_factory(&project_dir)?;
    let session = sessions
        .open_session()
        .await
        .context("Failed to open a session")?;

    match execute_scalar(session.as_ref(), &query).await {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Query failed: {}", e);
            std::process::exit(1);
        }
    }
}
