//! Image resolution

use crate::error::{ContainerError, Result};
use crate::runtime::ContainerRuntime;
use boxflow_core::BuildTarget;
use tracing::debug;

/// First image candidate of `target` present in the runtime
///
/// Returns `ContainerError::MissingImage` when none are present, which
/// pre-flight validation collects rather than aborting on.
pub async fn resolve_image<R: ContainerRuntime>(runtime: &R, target: &BuildTarget) -> Result<String> {
    for candidate in &target.images {
        if runtime.image_exists(candidate).await {
            debug!(target = %target.name, image = %candidate, "Resolved image");
            return Ok(candidate.clone());
        }
        debug!(target = %target.name, image = %candidate, "Image not present");
    }

    Err(ContainerError::MissingImage {
        target: target.name.clone(),
        tried: target.images.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRuntime;

    #[tokio::test]
    async fn test_first_present_candidate_wins() {
        let runtime = FakeRuntime::with_images(["y", "z"]);
        let target = BuildTarget::new("a", vec!["x".into(), "y".into(), "z".into()]);

        assert_eq!(resolve_image(&runtime, &target).await.unwrap(), "y");
        assert_eq!(runtime.probed(), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_no_candidate_is_missing_image() {
        let runtime = FakeRuntime::with_images(["other"]);
        let target = BuildTarget::new("a", vec!["x".into(), "y".into()]);

        let err = resolve_image(&runtime, &target).await.unwrap_err();
        assert!(err.is_missing_image());
        match err {
            ContainerError::MissingImage { target, tried } => {
                assert_eq!(target, "a");
                assert_eq!(tried, vec!["x", "y"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
