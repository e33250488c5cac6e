use crate::converter::RunSpec;
use crate::error::Result;

/// Container runtime operations used by the build stage
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Whether `image` is present locally; probe errors count as absent
    async fn image_exists(&self, image: &str) -> bool;

    /// Start a detached container and return its id
    async fn run_detached(&self, spec: &RunSpec) -> Result<String>;

    /// Stream the container output; `Ok(false)` when attach exits non-zero
    async fn attach(&self, container_id: &str) -> Result<bool>;

    /// Block until the container stops and return its exit code
    async fn wait(&self, container_id: &str) -> Result<i64>;

    async fn remove(&self, container_id: &str) -> Result<()>;
}
