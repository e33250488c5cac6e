use boxflow_container::ContainerError;
use boxflow_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(
        "aborting, without running any valid container builds\nOkay at container level    : {okay:?}\nMissing at container level : {missing:?}"
    )]
    Preflight {
        okay: Vec<String>,
        missing: Vec<String>,
    },
}

impl BuildError {
    /// Message for the terminal, with a hint where one helps
    pub fn user_message(&self) -> String {
        match self {
            BuildError::Config(ConfigError::TargetNotFound(name)) => {
                format!(
                    "no valid container images for building: {}\n\
                     \n\
                     Run `boxflow list` to see known targets.",
                    name
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
