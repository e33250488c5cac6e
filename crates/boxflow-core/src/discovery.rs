//! Project discovery
//!
//! Locates the checkout root and derives the convention-based paths of the
//! scripts and files that boxflow hands to external tools.

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Catalog location relative to the project root
pub const CATALOG_FILE: &str = "confs/machines.json";

/// Site-local environment snippet relative to the project root
pub const SITE_ENV_FILE: &str = "site-local.env";

/// Locate the project root
///
/// Search order:
/// 1. `BOXFLOW_PROJECT_ROOT`, if it contains `confs/machines.json`
/// 2. the current directory and its ancestors
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("BOXFLOW_PROJECT_ROOT") {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking BOXFLOW_PROJECT_ROOT");
        if path.join(CATALOG_FILE).is_file() {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
        warn!(env_root = %root, "BOXFLOW_PROJECT_ROOT has no {}", CATALOG_FILE);
    }

    let start_dir = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    find_project_root_from(&start_dir)
}

/// Walk upward from `start_dir` looking for `confs/machines.json`
pub fn find_project_root_from(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        debug!(checking = %current.display(), "Looking for {}", CATALOG_FILE);
        if current.join(CATALOG_FILE).is_file() {
            info!(project_root = %current.display(), "Found project root");
            return Ok(current);
        }
        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(ConfigError::ProjectRootNotFound(start_dir.to_path_buf()))
}

/// Convention-based paths below the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn site_env(&self) -> PathBuf {
        self.root.join(SITE_ENV_FILE)
    }

    /// `os/<stem>.<family>.<ext>`
    pub fn os_script(&self, stem: &str, family: &str, ext: &str) -> PathBuf {
        self.root
            .join("os")
            .join(format!("{}.{}.{}", stem, family, ext))
    }

    pub fn deploy_script(&self, family: &str) -> PathBuf {
        self.os_script("deploy", family, "sh")
    }

    /// Marker whose presence says the family's deploy script supports `-deferred`
    pub fn can_batch_marker(&self, family: &str) -> PathBuf {
        self.os_script("deploy", family, "can-batch")
    }

    pub fn local_setup_script(&self, family: &str) -> PathBuf {
        self.os_script("ptlocal", family, "sh")
    }

    pub fn invalidate_tool(&self) -> PathBuf {
        self.root.join("tools").join("caching_invalidate")
    }

    /// Host directory receiving the artifacts of one target
    pub fn output_dir(&self, target: &str) -> PathBuf {
        self.root.join("out").join(target)
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project_with_catalog() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("confs")).unwrap();
        fs::write(dir.path().join(CATALOG_FILE), "[]").unwrap();
        dir
    }

    #[test]
    fn test_find_project_root_from_subdirectory() {
        let project = project_with_catalog();
        let nested = project.path().join("os").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root_from(&nested).unwrap();
        assert_eq!(root, project.path());
    }

    #[test]
    fn test_find_project_root_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ProjectRootNotFound(_)));
    }

    #[test]
    #[serial_test::serial]
    fn test_find_project_root_env_var() {
        let project = project_with_catalog();
        temp_env::with_var(
            "BOXFLOW_PROJECT_ROOT",
            Some(project.path().as_os_str()),
            || {
                let root = find_project_root().unwrap();
                assert_eq!(root, project.path());
            },
        );
    }

    #[test]
    fn test_project_paths() {
        let paths = ProjectPaths::new("/srv/boxes");
        assert_eq!(
            paths.deploy_script("debian"),
            PathBuf::from("/srv/boxes/os/deploy.debian.sh")
        );
        assert_eq!(
            paths.can_batch_marker("debian"),
            PathBuf::from("/srv/boxes/os/deploy.debian.can-batch")
        );
        assert_eq!(
            paths.local_setup_script("rpm"),
            PathBuf::from("/srv/boxes/os/ptlocal.rpm.sh")
        );
        assert_eq!(
            paths.invalidate_tool(),
            PathBuf::from("/srv/boxes/tools/caching_invalidate")
        );
        assert_eq!(
            paths.output_dir("trixie"),
            PathBuf::from("/srv/boxes/out/trixie")
        );
        assert_eq!(paths.resolve(Path::new("in")), PathBuf::from("/srv/boxes/in"));
        assert_eq!(paths.resolve(Path::new("/data/in")), PathBuf::from("/data/in"));
    }
}
