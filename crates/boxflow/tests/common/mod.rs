//! Temporary project trees with fake external tools

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const CATALOG: &str = r#"[
    {"name": "A", "docker": ["x", "y"], "base_script": "debian", "repo": "bookworm"},
    {"name": "B", "docker": ["z"], "base_script": "debian"},
    {"name": "C", "docker": ["w"], "base_script": "rpm", "comment": "no image locally"}
]"#;

pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["confs", "os", "tools", "in"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        std::fs::write(dir.path().join("confs/machines.json"), CATALOG).unwrap();
        let project = Self { dir };
        project.script(
            &project.root().join("tools/caching_invalidate"),
            "echo \"invalidate $*\" >> \"$LOG\"",
        );
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn log(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    pub fn script(&self, path: &Path, body: &str) {
        let text = format!("#!/bin/sh\nLOG='{}'\n{}\n", self.log().display(), body);
        std::fs::write(path, text).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn deploy_script(&self, family: &str, body: &str) {
        let path = self.root().join(format!("os/deploy.{}.sh", family));
        self.script(
            &path,
            &format!("echo \"deploy.{} $*\" >> \"$LOG\"\n{}", family, body),
        );
    }

    pub fn can_batch(&self, family: &str) {
        std::fs::write(self.root().join(format!("os/deploy.{}.can-batch", family)), "").unwrap();
    }

    /// Fake container runtime that only knows `images`; every container exits 0
    pub fn fake_docker(&self, images: &[&str]) -> PathBuf {
        let path = self.root().join("fake-docker");
        let known = if images.is_empty() {
            "__none__".to_string()
        } else {
            images.join("|")
        };
        let body = format!(
            r#"echo "$*" >> "$LOG"
case "$1" in
  image) case "$3" in {known}) exit 0 ;; *) exit 1 ;; esac ;;
  run) echo c0ffee ;;
  attach) exit 0 ;;
  wait) echo 0 ;;
  rm) exit 0 ;;
esac"#
        );
        self.script(&path, &body);
        path
    }

    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }
}
