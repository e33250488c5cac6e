//! Per-family deferred deploy groups

use crate::error::{DeployError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredGroup {
    pub script: PathBuf,
    /// Target names in the order they were recorded
    pub targets: Vec<String>,
}

/// Deferred groups keyed by OS family, iterated in sorted family order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredGroups {
    groups: BTreeMap<String, DeferredGroup>,
}

impl DeferredGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `target` to `family`'s group
    ///
    /// The first target of a family fixes its script; a later target naming a
    /// different script is an error and leaves the group unchanged.
    pub fn record(&mut self, family: &str, script: &Path, target: &str) -> Result<()> {
        let group = self
            .groups
            .entry(family.to_string())
            .or_insert_with(|| DeferredGroup {
                script: script.to_path_buf(),
                targets: Vec::new(),
            });

        if group.script != script {
            return Err(DeployError::InconsistentBatchMapping {
                family: family.to_string(),
                existing: group.script.clone(),
                requested: script.to_path_buf(),
            });
        }

        group.targets.push(target.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeferredGroup)> {
        self.groups.iter().map(|(family, group)| (family.as_str(), group))
    }

    /// Every deferred name, family order first, then recording order
    pub fn all_targets(&self) -> Vec<String> {
        self.groups
            .values()
            .flat_map(|g| g.targets.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sorted_by_family() {
        let mut groups = DeferredGroups::new();
        groups.record("rpm", Path::new("os/deploy.rpm.sh"), "C").unwrap();
        groups.record("debian", Path::new("os/deploy.debian.sh"), "A").unwrap();
        groups.record("debian", Path::new("os/deploy.debian.sh"), "B").unwrap();

        let families: Vec<_> = groups.iter().map(|(f, _)| f).collect();
        assert_eq!(families, vec!["debian", "rpm"]);
        assert_eq!(groups.all_targets(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_inconsistent_script_rejected() {
        let mut groups = DeferredGroups::new();
        groups.record("debian", Path::new("one.sh"), "A").unwrap();
        let err = groups.record("debian", Path::new("two.sh"), "B").unwrap_err();

        assert!(matches!(
            err,
            DeployError::InconsistentBatchMapping { ref family, .. } if family == "debian"
        ));
        assert_eq!(groups.all_targets(), vec!["A"]);
    }
}
