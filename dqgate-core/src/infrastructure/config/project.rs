// dqgate-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::check::CheckSpec;
use crate::domain::error::DomainError;
use crate::domain::policy::FailurePolicy;
use crate::domain::registry::star_schema_suite;
use crate::domain::scalar::Scalar;
use crate::infrastructure::adapters::datafusion::DataFusionEngine;
use crate::infrastructure::adapters::duckdb::DuckDbEngine;
use crate::infrastructure::adapters::{SourceFormat, SourceTable};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::executor::SessionFactory;

pub const CONFIG_CANDIDATES: [&str; 2] = ["dqgate.yaml", "dqgate.yml"];

/// SQL engine the checks run on.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    DuckDB,
    DataFusion,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default)]
    pub engine: Engine,

    /// DuckDB database file, relative to the project directory.
    #[serde(default = "default_database")]
    #[validate(length(min = 1, message = "Database path cannot be empty"))]
    pub database: String,

    #[serde(default)]
    pub policy: FailurePolicy,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    /// Run the star-schema suite before the declared checks.
    #[serde(rename = "default-suite", default)]
    pub default_suite: bool,

    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SourceConfig {
    Path(String),
    Detailed {
        path: String,
        format: Option<SourceFormat>,
    },
}

impl SourceConfig {
    fn path(&self) -> &str {
        match self {
            SourceConfig::Path(path) | SourceConfig::Detailed { path, .. } => path,
        }
    }

    fn format(&self) -> Option<SourceFormat> {
        match self {
            SourceConfig::Path(_) => None,
            SourceConfig::Detailed { format, .. } => *format,
        }
    }
}

/// One entry of the `checks:` list, tagged by `kind`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckConfig {
    TableNotEmpty {
        table: String,
    },
    ColumnNoNulls {
        table: String,
        column: String,
    },
    Custom {
        #[serde(default)]
        name: Option<String>,
        query: String,
        expected: Scalar,
    },
}

impl CheckConfig {
    pub fn to_spec(&self) -> Result<CheckSpec, DomainError> {
        match self {
            CheckConfig::TableNotEmpty { table } => CheckSpec::table_not_empty(table),
            CheckConfig::ColumnNoNulls { table, column } => {
                CheckSpec::column_no_nulls(table, column)
            }
            CheckConfig::Custom {
                name,
                query,
                expected,
            } => {
                let spec = CheckSpec::custom(query, expected.clone())?;
                Ok(match name {
                    Some(name) => spec.named(name),
                    None => spec,
                })
            }
        }
    }
}

impl ProjectConfig {
    /// Star-schema suite first (when enabled), then the declared checks in order.
    pub fn build_checks(&self) -> Result<Vec<CheckSpec>, DomainError> {
        let mut checks = if self.default_suite {
            star_schema_suite()?
        } else {
            Vec::new()
        };
        for check in &self.checks {
            checks.push(check.to_spec()?);
        }
        Ok(checks)
    }

    pub fn target_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.target_path)
    }

    pub fn database_path(&self, project_dir: &Path) -> String {
        if self.database == ":memory:" || Path::new(&self.database).is_absolute() {
            return self.database.clone();
        }
        project_dir.join(&self.database).to_string_lossy().into_owned()
    }

    pub fn resolve_sources(&self, project_dir: &Path) -> Result<Vec<SourceTable>, InfrastructureError> {
        self.sources
            .iter()
            .map(|(name, source)| {
                let raw = Path::new(source.path());
                let path = if raw.is_absolute() {
                    raw.to_path_buf()
                } else {
                    project_dir.join(raw)
                };
                let format = match source.format() {
                    Some(format) => format,
                    None => SourceFormat::from_path(&path)?,
                };
                Ok(SourceTable {
                    name: name.clone(),
                    path,
                    format,
                })
            })
            .collect()
    }

    /// Builds the session factory for the configured engine.
    pub fn session_factory(
        &self,
        project_dir: &Path,
    ) -> Result<Box<dyn SessionFactory>, InfrastructureError> {
        let sources = self.resolve_sources(project_dir)?;
        let factory: Box<dyn SessionFactory> = match self.engine {
            Engine::DuckDB => {
                Box::new(DuckDbEngine::new(&self.database_path(project_dir)).with_sources(sources))
            }
            Engine::DataFusion => Box::new(DataFusionEngine::new(sources)),
        };
        Ok(factory)
    }
}

fn default_database() -> String {
    ":memory:".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}

// --- LOADER ---

pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // Layering: DQGATE_POLICY=collect_all dqgate check
    load_project_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_project_config`], with overrides read through `lookup`.
#[instrument(skip(project_dir, lookup))]
pub fn load_project_config_with<F>(
    project_dir: &Path,
    lookup: F,
) -> Result<ProjectConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading quality gate configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config = parse_project_config(&content)?;
    apply_env_overrides(&mut config, lookup)?;

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

pub fn parse_project_config(content: &str) -> Result<ProjectConfig, InfrastructureError> {
    Ok(serde_yaml::from_str(content)?)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

pub fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("DQGATE_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
    if let Some(val) = lookup("DQGATE_POLICY") {
        let policy = val
            .parse::<FailurePolicy>()
            .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
        info!(old = %config.policy, new = %policy, "Overriding policy via ENV");
        config.policy = policy;
    }
    if let Some(val) = lookup("DQGATE_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    Ok(())
}
