use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("deploy of {target} failed with exit code {code}")]
    ScriptFailed { target: String, code: i32 },

    #[error("deferred deploy for family {family} failed with exit code {code}")]
    DeferredFailed { family: String, code: i32 },

    #[error("family {family} maps to two deploy scripts: {existing} and {requested}")]
    InconsistentBatchMapping {
        family: String,
        existing: PathBuf,
        requested: PathBuf,
    },

    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// Process exit status to propagate for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::ScriptFailed { code, .. } | DeployError::DeferredFailed { code, .. } => {
                *code
            }
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
