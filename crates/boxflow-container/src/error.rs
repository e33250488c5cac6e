use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error(
        "{target}: no usable image, tried {tried:?}\n\nhint:\n  • pull or build one of the listed images\n  • check the \"docker\" list of this target in confs/machines.json"
    )]
    MissingImage { target: String, tried: Vec<String> },

    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("`{command}` produced unexpected output: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input assets directory {path} is unusable: {source}")]
    AssetDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContainerError {
    /// Missing images are collected during pre-flight instead of aborting
    pub fn is_missing_image(&self) -> bool {
        matches!(self, ContainerError::MissingImage { .. })
    }
}

pub type Result<T> = std::result::Result<T, ContainerError>;
