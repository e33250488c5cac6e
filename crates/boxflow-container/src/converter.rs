//! Run specification to runtime CLI arguments

use boxflow_core::Invocation;
use std::path::PathBuf;

/// Container path of the read-only input assets
pub const CONTAINER_IN_DIR: &str = "/in";
/// Container path receiving build artifacts
pub const CONTAINER_OUT_DIR: &str = "/out";
/// Container path of the read-only project checkout, also the working directory
pub const CONTAINER_REPO_DIR: &str = "/vagrant";

/// Bind mount of a host directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub source: PathBuf,
    pub target: String,
    pub read_only: bool,
}

impl Mount {
    pub fn read_only(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: true,
        }
    }

    pub fn read_write(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }

    /// `--mount` value
    pub fn to_arg(&self) -> String {
        let mut arg = format!(
            "type=bind,src={},dst={}",
            self.source.display(),
            self.target
        );
        if self.read_only {
            arg.push_str(",readonly");
        }
        arg
    }
}

/// Everything needed to start one build container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub image: String,
    pub env: Vec<(String, String)>,
    pub mounts: Vec<Mount>,
    pub workdir: String,
    /// Entry point argv, e.g. `["/bin/bash", "-c", "..."]`
    pub command: Vec<String>,
}

impl RunSpec {
    /// `<runtime> run -dt ...` invocation, detached with a tty
    pub fn to_invocation(&self, runtime: &str) -> Invocation {
        let mut inv = Invocation::new(runtime).arg("run").arg("-dt");
        for (key, value) in &self.env {
            inv = inv.opt("-e", format!("{}={}", key, value));
        }
        for mount in &self.mounts {
            inv = inv.opt("--mount", mount.to_arg());
        }
        inv.opt("-w", &self.workdir)
            .arg(&self.image)
            .args(&self.command)
    }
}
