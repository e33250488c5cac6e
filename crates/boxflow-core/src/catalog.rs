//! Target catalog
//!
//! Loads `confs/machines.json` once and answers lookups by name. Entries
//! without a `docker` key describe non-container machines and are skipped.

use crate::error::{ConfigError, Result};
use crate::model::BuildTarget;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Immutable set of build targets keyed by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    targets: BTreeMap<String, BuildTarget>,
}

impl Catalog {
    /// Load the catalog from a JSON file
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_entries(entries).map_err(|e| match e {
            ConfigError::Json { source, .. } => ConfigError::Json {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(targets = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(content).map_err(|source| ConfigError::Json {
                path: "<inline>".into(),
                source,
            })?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<serde_json::Value>) -> Result<Self> {
        let mut targets = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.get("docker").is_none() {
                debug!(entry = %entry, "Skipping entry without docker images");
                continue;
            }
            let target: BuildTarget =
                serde_json::from_value(entry).map_err(|source| ConfigError::Json {
                    path: "<inline>".into(),
                    source,
                })?;
            targets.push(target);
        }
        Self::from_targets(targets)
    }

    /// Build a catalog from already constructed targets
    pub fn from_targets(targets: impl IntoIterator<Item = BuildTarget>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for target in targets {
            if map.contains_key(&target.name) {
                return Err(ConfigError::DuplicateTarget(target.name));
            }
            if target.images.is_empty() {
                return Err(ConfigError::EmptyImageList(target.name));
            }
            map.insert(target.name.clone(), target);
        }
        Ok(Self { targets: map })
    }

    /// All known target names, sorted
    pub fn all_names(&self) -> Vec<&str> {
        self.targets.keys().map(String::as_str).collect()
    }

    pub fn lookup(&self, name: &str) -> Result<&BuildTarget> {
        self.targets
            .get(name)
            .ok_or_else(|| ConfigError::TargetNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Targets in name order
    pub fn iter(&self) -> impl Iterator<Item = &BuildTarget> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The requested names, or every known name when none were given
    pub fn select(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.all_names().into_iter().map(String::from).collect()
        } else {
            requested.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"name": "trixie", "docker": ["debian:trixie"], "base_script": "debian"},
        {"name": "vagrant-only", "box": "generic/alpine"},
        {"name": "alma9", "docker": ["almalinux:9-build", "almalinux:9"], "base_script": "rpm", "repo": "el9"},
        {"name": "bookworm", "docker": ["debian:bookworm"], "base_script": "debian", "box_version_pin": 202406}
    ]"#;

    #[test]
    fn test_all_names_sorted_and_skips_non_docker() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.all_names(), vec!["alma9", "bookworm", "trixie"]);
        assert!(!catalog.contains("vagrant-only"));
    }

    #[test]
    fn test_duplicate_name_fails() {
        let json = r#"[
            {"name": "a", "docker": ["x"]},
            {"name": "b", "docker": ["y"]},
            {"name": "a", "docker": ["z"]}
        ]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTarget(name) if name == "a"));
    }

    #[test]
    fn test_duplicate_without_docker_is_ignored() {
        let json = r#"[
            {"name": "a", "docker": ["x"]},
            {"name": "a", "box": "generic/debian12"}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_empty_image_list_fails() {
        let json = r#"[{"name": "a", "docker": []}]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyImageList(_)));
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let target = catalog.lookup("alma9").unwrap();
        assert_eq!(target.images, vec!["almalinux:9-build", "almalinux:9"]);
        assert_eq!(target.repo.as_deref(), Some("el9"));

        let err = catalog.lookup("missing").unwrap_err();
        assert!(matches!(err, ConfigError::TargetNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_select_defaults_to_all() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            catalog.select(&[]),
            vec!["alma9".to_string(), "bookworm".to_string(), "trixie".to_string()]
        );
        let picked = vec!["trixie".to_string(), "alma9".to_string()];
        assert_eq!(catalog.select(&picked), picked);
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machines.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Catalog::load(&path).unwrap_err();
        match err {
            ConfigError::Json { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }

        let err = Catalog::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_targets_rejects_duplicates() {
        let targets = vec![
            BuildTarget::new("a", vec!["x".to_string()]),
            BuildTarget::new("a", vec!["y".to_string()]),
        ];
        assert!(matches!(
            Catalog::from_targets(targets),
            Err(ConfigError::DuplicateTarget(_))
        ));
    }
}
