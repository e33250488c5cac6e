//! Container runtime CLI wrapper
//!
//! Drives `docker` (or a CLI-compatible runtime such as `podman`) through
//! argument vectors.

use crate::converter::RunSpec;
use crate::error::{ContainerError, Result};
use crate::runtime::ContainerRuntime;
use boxflow_core::Invocation;
use std::process::Stdio;

/// Runtime CLI wrapper
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.binary)
    }

    async fn status(&self, inv: &Invocation, quiet_stdout: bool) -> Result<bool> {
        let mut cmd = inv.command();
        if quiet_stdout {
            cmd.stdout(Stdio::null());
        }
        tracing::debug!("Running: {}", inv);
        let status = cmd.status().await.map_err(|e| ContainerError::CommandFailed {
            command: inv.to_string(),
            message: e.to_string(),
        })?;
        Ok(status.success())
    }

    /// Run and capture stdout; non-zero exit is an error
    async fn capture(&self, inv: &Invocation) -> Result<String> {
        let mut cmd = inv.command();
        cmd.stdout(Stdio::piped());
        tracing::debug!("Running: {}", inv);
        let output = cmd.output().await.map_err(|e| ContainerError::CommandFailed {
            command: inv.to_string(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(ContainerError::CommandFailed {
                command: inv.to_string(),
                message: format!("exited with {}", output.status),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl ContainerRuntime for DockerCli {
    async fn image_exists(&self, image: &str) -> bool {
        let inv = self.invocation().args(["image", "inspect", image]);
        tracing::debug!("Probing: {}", inv);
        match inv.quiet_command().status().await {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::debug!(image, error = %e, "Image probe failed to run");
                false
            }
        }
    }

    async fn run_detached(&self, spec: &RunSpec) -> Result<String> {
        let inv = spec.to_invocation(&self.binary);
        eprintln!("+ {}", inv);
        let container_id = self.capture(&inv).await?;
        if container_id.is_empty() {
            return Err(ContainerError::UnexpectedOutput {
                command: inv.to_string(),
                output: container_id,
            });
        }
        Ok(container_id)
    }

    async fn attach(&self, container_id: &str) -> Result<bool> {
        let inv = self.invocation().args(["attach", container_id]);
        self.status(&inv, false).await
    }

    async fn wait(&self, container_id: &str) -> Result<i64> {
        let inv = self.invocation().args(["wait", container_id]);
        let output = self.capture(&inv).await?;
        let code = output
            .lines()
            .last()
            .and_then(|line| line.trim().parse::<i64>().ok());
        code.ok_or(ContainerError::UnexpectedOutput {
            command: inv.to_string(),
            output,
        })
    }

    async fn remove(&self, container_id: &str) -> Result<()> {
        let inv = self.invocation().args(["rm", container_id]);
        if self.status(&inv, true).await? {
            Ok(())
        } else {
            Err(ContainerError::CommandFailed {
                command: inv.to_string(),
                message: "container removal failed".to_string(),
            })
        }
    }
}
