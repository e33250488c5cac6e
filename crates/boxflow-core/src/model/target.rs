//! Build target definition

use serde::{Deserialize, Serialize};

/// OS family used when a target does not name one
pub const DEFAULT_OS_FAMILY: &str = "default";

/// One named buildable unit
///
/// JSON form (one element of `confs/machines.json`):
/// ```json
/// {
///   "name": "bookworm",
///   "docker": ["debian:bookworm-build", "debian:bookworm"],
///   "base_script": "debian",
///   "repo": "bookworm",
///   "gpg_command": "gpg2"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub name: String,
    /// Image candidates in order of preference
    #[serde(rename = "docker")]
    pub images: Vec<String>,
    /// Selects the `os/*.<family>.sh` scripts
    #[serde(default)]
    pub base_script: Option<String>,
    /// Package repository the build registers inside the container
    #[serde(default)]
    pub repo: Option<String>,
    /// Alternate GPG binary exported to the setup steps
    #[serde(default)]
    pub gpg_command: Option<String>,
    /// Passthrough metadata, never used in control flow
    #[serde(default)]
    pub box_version_pin: Option<serde_json::Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BuildTarget {
    pub fn new(name: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            name: name.into(),
            images,
            base_script: None,
            repo: None,
            gpg_command: None,
            box_version_pin: None,
            comment: None,
        }
    }

    /// OS family of this target, falling back to `default`
    pub fn os_family(&self) -> &str {
        self.base_script.as_deref().unwrap_or(DEFAULT_OS_FAMILY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_family_defaults() {
        let target = BuildTarget::new("plain", vec!["img".to_string()]);
        assert_eq!(target.os_family(), "default");

        let target = BuildTarget {
            base_script: Some("debian".to_string()),
            ..target
        };
        assert_eq!(target.os_family(), "debian");
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let json = r#"{
            "name": "jammy",
            "docker": ["ubuntu:jammy"],
            "base_script": "debian",
            "gpg_command": "gpg2",
            "comment": "LTS"
        }"#;
        let target: BuildTarget = serde_json::from_str(json).unwrap();

        assert_eq!(target.images, vec!["ubuntu:jammy"]);
        assert_eq!(target.gpg_command.as_deref(), Some("gpg2"));
        assert_eq!(target.comment.as_deref(), Some("LTS"));
        assert!(target.repo.is_none());
        assert!(target.box_version_pin.is_none());
    }
}
