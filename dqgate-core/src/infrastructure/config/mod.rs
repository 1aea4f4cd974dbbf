// dqgate-core/src/infrastructure/config/mod.rs

pub mod project;

pub use project::{
    CheckConfig, Engine, ProjectConfig, SourceConfig, load_project_config, load_project_config_with,
};
