//! Site-local environment overlay
//!
//! `site-local.env` is a shell snippet. It is sourced by `bash` and the
//! resulting environment is diffed against a plain `bash` environment; only
//! new or changed variables are copied into this process.

use crate::discovery::ProjectPaths;
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Shell nesting depth, always differs between the two captures
const EXCLUDED_VAR: &str = "SHLVL";

/// Apply `site-local.env` to the process environment
///
/// Returns the names of the variables that were set, sorted. A missing file
/// is not an error.
#[tracing::instrument(skip(paths), fields(root = %paths.root().display()))]
pub fn apply_site_env(paths: &ProjectPaths) -> Result<Vec<String>> {
    let file = paths.site_env();
    if !file.is_file() {
        debug!(file = %file.display(), "No site environment file");
        return Ok(Vec::new());
    }

    let before = capture_env(None, paths.root())?;
    let after = capture_env(Some(&file), paths.root())?;
    let changes = diff_env(&before, &after);

    for (key, value) in &changes {
        debug!(variable = %key, "Applying site environment variable");
        // SAFETY: runs once during start-up, before any other thread exists
        unsafe {
            std::env::set_var(key, value);
        }
    }

    info!(
        file = %file.display(),
        applied = changes.len(),
        "Site environment applied"
    );
    Ok(changes.into_iter().map(|(k, _)| k).collect())
}

/// Variables that are new or changed in `after`, excluding `SHLVL`
pub fn diff_env(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    after
        .iter()
        .filter(|(k, _)| k.as_str() != EXCLUDED_VAR)
        .filter(|(k, v)| before.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Parse `printenv --null` output
pub fn parse_null_separated(raw: &[u8]) -> BTreeMap<String, String> {
    raw.split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let entry = String::from_utf8_lossy(entry);
            let (k, v) = entry.split_once('=')?;
            Some((k.to_string(), v.to_string()))
        })
        .collect()
}

fn capture_env(snippet: Option<&Path>, cwd: &Path) -> Result<BTreeMap<String, String>> {
    let mut cmd = Command::new("bash");
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit());
    match snippet {
        Some(file) => {
            cmd.arg("-c")
                .arg(r#". "$1"; printenv --null"#)
                .arg("bash")
                .arg(file);
        }
        None => {
            cmd.arg("-c").arg("printenv --null");
        }
    }

    let site_file = snippet.unwrap_or(cwd).to_path_buf();
    let output = cmd.output().map_err(|e| ConfigError::SiteEnv {
        path: site_file.clone(),
        message: format!("failed to run bash: {}", e),
    })?;
    if !output.status.success() {
        return Err(ConfigError::SiteEnv {
            path: site_file,
            message: format!("bash exited with {}", output.status),
        });
    }

    Ok(parse_null_separated(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_env_new_and_changed_only() {
        let before = env(&[("HOME", "/root"), ("PATH", "/usr/bin"), ("SHLVL", "1")]);
        let after = env(&[
            ("HOME", "/root"),
            ("PATH", "/opt/bin:/usr/bin"),
            ("PKG_EMAIL", "builder@example.org"),
            ("SHLVL", "2"),
        ]);

        assert_eq!(
            diff_env(&before, &after),
            vec![
                ("PATH".to_string(), "/opt/bin:/usr/bin".to_string()),
                ("PKG_EMAIL".to_string(), "builder@example.org".to_string()),
            ]
        );
    }

    #[test]
    fn test_diff_env_excludes_new_shlvl() {
        let before = env(&[]);
        let after = env(&[("SHLVL", "3")]);
        assert!(diff_env(&before, &after).is_empty());
    }

    #[test]
    fn test_parse_null_separated() {
        let parsed = parse_null_separated(b"A=1\0B=x=y\0EMPTY=\0junk\0");
        assert_eq!(parsed, env(&[("A", "1"), ("B", "x=y"), ("EMPTY", "")]));
    }

    #[test]
    fn test_missing_site_env_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let applied = apply_site_env(&ProjectPaths::new(dir.path())).unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_apply_site_env_sets_variables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("site-local.env"),
            "export BOXFLOW_TEST_SITE_VAR='from site'\nexport PKG_BOXFLOW_TEST=1\n",
        )
        .unwrap();

        temp_env::with_vars_unset(["BOXFLOW_TEST_SITE_VAR", "PKG_BOXFLOW_TEST"], || {
            let applied = apply_site_env(&ProjectPaths::new(dir.path())).unwrap();
            assert!(applied.contains(&"BOXFLOW_TEST_SITE_VAR".to_string()));
            assert!(applied.contains(&"PKG_BOXFLOW_TEST".to_string()));
            assert!(!applied.contains(&"SHLVL".to_string()));
            assert_eq!(
                std::env::var("BOXFLOW_TEST_SITE_VAR").unwrap(),
                "from site"
            );
        });
    }

    #[test]
    #[serial_test::serial]
    fn test_site_env_exit_status_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("site-local.env"),
            "export PKG_BOXFLOW_TRAILING=1\n[ -n \"$BOXFLOW_NEVER_SET\" ] && export BOXFLOW_OTHER=2\n",
        )
        .unwrap();

        temp_env::with_vars_unset(
            ["PKG_BOXFLOW_TRAILING", "BOXFLOW_NEVER_SET", "BOXFLOW_OTHER"],
            || {
                let applied = apply_site_env(&ProjectPaths::new(dir.path())).unwrap();
                assert!(applied.contains(&"PKG_BOXFLOW_TRAILING".to_string()));
                assert!(!applied.contains(&"BOXFLOW_OTHER".to_string()));
                assert_eq!(std::env::var("PKG_BOXFLOW_TRAILING").unwrap(), "1");
            },
        );
    }
}
