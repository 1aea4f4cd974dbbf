// dqgate/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dqgate")]
#[command(about = "Data-quality gate for star-schema warehouses", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧪 Runs the configured data-quality checks (exit 1 on failures, 2 on engine errors)
    Check {
        /// Project directory (contains dqgate.yaml)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Evaluate every check instead of stopping at the first failure
        #[arg(long)]
        collect_all: bool,

        /// Per-query deadline in seconds
        #[arg(long, env = "DQGATE_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,

        /// Do not write target/run_report.json
        #[arg(long)]
        no_report: bool,
    },

    /// 📋 Lists the configured checks and their queries without running them
    List {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ⚡ Executes an ad-hoc scalar query on the configured engine
    Query {
        query: String,
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
