//! Container runner
//!
//! Runs one target's build inside an ephemeral container and cleans it up.

use crate::converter::{CONTAINER_IN_DIR, CONTAINER_OUT_DIR, CONTAINER_REPO_DIR, Mount, RunSpec};
use crate::entrypoint::{EntrypointOptions, entrypoint_command, entrypoint_steps};
use crate::error::{ContainerError, Result};
use crate::runtime::ContainerRuntime;
use boxflow_core::{BuildTarget, ProjectPaths, Settings};
use colored::Colorize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    pub skip_os_update: bool,
    /// Leave failed containers in place for inspection
    pub keep_failed_builds: bool,
}

pub struct ContainerRunner<'a, R> {
    runtime: &'a R,
    paths: &'a ProjectPaths,
    settings: &'a Settings,
    options: RunnerOptions,
}

impl<'a, R: ContainerRuntime> ContainerRunner<'a, R> {
    pub fn new(
        runtime: &'a R,
        paths: &'a ProjectPaths,
        settings: &'a Settings,
        options: RunnerOptions,
    ) -> Self {
        Self {
            runtime,
            paths,
            settings,
            options,
        }
    }

    pub fn runtime(&self) -> &R {
        self.runtime
    }

    /// Prepare the output directory and describe the container to start
    pub fn run_spec(&self, target: &BuildTarget, image: &str) -> Result<RunSpec> {
        let out_dir = self.paths.output_dir(&target.name);
        std::fs::create_dir_all(&out_dir).map_err(|source| ContainerError::OutputDir {
            path: out_dir.clone(),
            source,
        })?;
        let out_dir = out_dir
            .canonicalize()
            .map_err(|source| ContainerError::OutputDir {
                path: out_dir.clone(),
                source,
            })?;

        let asset_dir = self.paths.resolve(&self.settings.asset_dir);
        let asset_dir = asset_dir
            .canonicalize()
            .map_err(|source| ContainerError::AssetDir {
                path: asset_dir.clone(),
                source,
            })?;

        let repo_dir = self
            .paths
            .root()
            .canonicalize()
            .map_err(|source| ContainerError::AssetDir {
                path: self.paths.root().to_path_buf(),
                source,
            })?;

        let steps = entrypoint_steps(
            target,
            self.paths,
            EntrypointOptions {
                skip_os_update: self.options.skip_os_update,
                local_setup: self.settings.local_setup,
            },
        );

        Ok(RunSpec {
            image: image.to_string(),
            env: self.settings.container_env(),
            mounts: vec![
                Mount::read_only(asset_dir, CONTAINER_IN_DIR),
                Mount::read_write(out_dir, CONTAINER_OUT_DIR),
                Mount::read_only(repo_dir, CONTAINER_REPO_DIR),
            ],
            workdir: CONTAINER_REPO_DIR.to_string(),
            command: entrypoint_command(&steps),
        })
    }

    /// Build `target` in a fresh container from `image`
    ///
    /// `Ok(false)` means the build ran and failed. `Err` means the container
    /// could not be started at all.
    pub async fn run(&self, target: &BuildTarget, image: &str) -> Result<bool> {
        let spec = self.run_spec(target, image)?;
        let container_id = self.runtime.run_detached(&spec).await?;
        println!(
            "[{}] running {}: {}",
            target.name.cyan(),
            image,
            container_id
        );

        let succeeded = self.follow(target, &container_id).await;

        if succeeded || !self.options.keep_failed_builds {
            println!(
                "[{}] removing container ({}): {}",
                target.name.cyan(),
                image,
                container_id
            );
            if let Err(e) = self.runtime.remove(&container_id).await {
                warn!(target = %target.name, container = %container_id, error = %e, "Container removal failed");
            }
        } else {
            println!(
                "[{}] {} container {} for inspection",
                target.name.cyan(),
                "keeping".yellow(),
                container_id
            );
        }

        Ok(succeeded)
    }

    /// Attach, then wait; any failure marks the build failed
    async fn follow(&self, target: &BuildTarget, container_id: &str) -> bool {
        match self.runtime.attach(container_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(target = %target.name, "Attach exited non-zero");
                return false;
            }
            Err(e) => {
                warn!(target = %target.name, error = %e, "Attach failed");
                return false;
            }
        }

        match self.runtime.wait(container_id).await {
            Ok(0) => true,
            Ok(code) => {
                debug!(target = %target.name, code, "Container exited non-zero");
                false
            }
            Err(e) => {
                warn!(target = %target.name, error = %e, "Wait failed");
                false
            }
        }
    }
}
