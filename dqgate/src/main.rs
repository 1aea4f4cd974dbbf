// dqgate/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug dqgate check ... pour voir les requêtes
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            project_dir,
            collect_all,
            timeout_secs,
            no_report,
        } => commands::check::execute(project_dir, collect_all, timeout_secs, no_report).await,
        Commands::List { project_dir } => commands::list::execute(project_dir),
        Commands::Query { query, project_dir } => {
            commands::query::execute(query, project_dir).await
        }
    }
}
