//! In-memory container runtime for tests

use crate::converter::RunSpec;
use crate::error::{ContainerError, Result};
use crate::runtime::ContainerRuntime;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Records every call; containers exit 0 unless configured otherwise
///
/// Attach succeeds unless `failing_attach` names the image; the exit code
/// set with `exit_code` is only reported by `wait`.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    images: BTreeSet<String>,
    exit_codes: BTreeMap<String, i64>,
    failing_attach: BTreeSet<String>,
    failing_start: BTreeSet<String>,
    state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    probed: Vec<String>,
    events: Vec<String>,
    specs: Vec<RunSpec>,
    containers: BTreeMap<String, String>,
}

impl FakeRuntime {
    pub fn with_images<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: images.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Containers started from `image` exit with `code`
    pub fn exit_code(mut self, image: &str, code: i64) -> Self {
        self.exit_codes.insert(image.to_string(), code);
        self
    }

    /// Attach to containers of `image` exits non-zero
    pub fn failing_attach(mut self, image: &str) -> Self {
        self.failing_attach.insert(image.to_string());
        self
    }

    pub fn failing_start(mut self, image: &str) -> Self {
        self.failing_start.insert(image.to_string());
        self
    }

    pub fn probed(&self) -> Vec<String> {
        self.lock().probed.clone()
    }

    /// `run <image>`, `attach <id>`, `wait <id>`, `rm <id>` in call order
    pub fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    pub fn specs(&self) -> Vec<RunSpec> {
        self.lock().specs.clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("rm ").map(String::from))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn image_of(&self, container_id: &str) -> String {
        self.lock()
            .containers
            .get(container_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl ContainerRuntime for FakeRuntime {
    async fn image_exists(&self, image: &str) -> bool {
        self.lock().probed.push(image.to_string());
        self.images.contains(image)
    }

    async fn run_detached(&self, spec: &RunSpec) -> Result<String> {
        let mut state = self.lock();
        state.events.push(format!("run {}", spec.image));
        if self.failing_start.contains(&spec.image) {
            return Err(ContainerError::CommandFailed {
                command: format!("run {}", spec.image),
                message: "simulated start failure".to_string(),
            });
        }
        let id = format!("ctr{}", state.specs.len());
        state.specs.push(spec.clone());
        state.containers.insert(id.clone(), spec.image.clone());
        Ok(id)
    }

    async fn attach(&self, container_id: &str) -> Result<bool> {
        let image = self.image_of(container_id);
        self.lock().events.push(format!("attach {}", container_id));
        Ok(!self.failing_attach.contains(&image))
    }

    async fn wait(&self, container_id: &str) -> Result<i64> {
        let image = self.image_of(container_id);
        self.lock().events.push(format!("wait {}", container_id));
        Ok(self.exit_codes.get(&image).copied().unwrap_or(0))
    }

    async fn remove(&self, container_id: &str) -> Result<()> {
        self.lock().events.push(format!("rm {}", container_id));
        Ok(())
    }
}
