// dqgate/src/commands/list.rs
//
// USE CASE: Show what `check` would run, without touching the engine.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table;
use dqgate_core::infrastructure::config::load_project_config;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load quality gate configuration from {:?}",
            project_dir
        )
    })?;
    let checks = config
        .build_checks()
        .context("Invalid check in configuration")?;

    println!(
        "📋 {} checks for '{}' (policy: {})",
        checks.len(),
        config.name,
        config.policy
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Check", "Kind", "Expected", "Query"]);
    for (index, check) in checks.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            check.name().to_string(),
            check.kind().to_string(),
            check.expected().to_string(),
            check.query().to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
