use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate definition for target '{0}'")]
    DuplicateTarget(String),

    #[error("target '{0}' lists no container images")]
    EmptyImageList(String),

    #[error("unknown target: {0}")]
    TargetNotFound(String),

    #[error(
        "project root not found\nsearched upward from: {0}\nhint: run inside a checkout containing confs/machines.json or set BOXFLOW_PROJECT_ROOT"
    )]
    ProjectRootNotFound(PathBuf),

    #[error("failed to source site environment {path}: {message}")]
    SiteEnv { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
