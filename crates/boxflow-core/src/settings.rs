//! Environment-derived settings
//!
//! Read once, after `site-local.env` has been applied to the process
//! environment.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default GnuPG download mirror handed to in-container builds
pub const DEFAULT_MIRROR: &str = "https://www.mirrorservice.org/sites/ftp.gnupg.org/gcrypt/";

/// Variables with this prefix are forwarded into build containers
pub const FORWARD_PREFIX: &str = "PKG_";

/// Never forwarded despite carrying the prefix
pub const FORWARD_EXCLUDED: &str = "PKG_CONFIG_PATH";

const MIRROR_VAR: &str = "PT_GNUPG_DOWNLOAD_MIRROR";
const ASSET_DIR_VAR: &str = "PT_GNUPG_IN";
const INITIAL_DEPLOY_VAR: &str = "PT_INITIAL_DEPLOY";
const SKIP_BUILD_VAR: &str = "PT_SKIP_BUILD";
const SKIP_DEPLOY_VAR: &str = "PT_SKIP_DEPLOY";
const SKIP_CONFIRM_VAR: &str = "PT_SKIP_CONFIRM";
const LOCAL_SETUP_VAR: &str = "PT_LOCAL_SETUP";
const RUNTIME_VAR: &str = "BOXFLOW_CONTAINER_RUNTIME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Download mirror, forwarded as `MIRROR`
    pub mirror: String,
    /// `PKG_*` variables forwarded verbatim, sorted by name
    pub forwarded: BTreeMap<String, String>,
    /// `PT_INITIAL_DEPLOY`, forwarded when present
    pub initial_deploy: Option<String>,
    /// Host input-assets directory, relative paths resolve against the project root
    pub asset_dir: PathBuf,
    pub skip_build: bool,
    pub skip_deploy: bool,
    pub skip_confirm: bool,
    /// Enables the `os/ptlocal.<family>.sh` step on this machine
    pub local_setup: bool,
    /// Container runtime CLI
    pub container_runtime: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_vars(std::iter::empty::<(String, String)>())
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let want = |name: &str| vars.get(name).is_some_and(|v| !v.is_empty());

        let forwarded = vars
            .iter()
            .filter(|(k, _)| k.starts_with(FORWARD_PREFIX) && k.as_str() != FORWARD_EXCLUDED)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            mirror: vars
                .get(MIRROR_VAR)
                .cloned()
                .unwrap_or_else(|| DEFAULT_MIRROR.to_string()),
            forwarded,
            initial_deploy: vars.get(INITIAL_DEPLOY_VAR).cloned(),
            asset_dir: vars
                .get(ASSET_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("in")),
            skip_build: want(SKIP_BUILD_VAR),
            skip_deploy: want(SKIP_DEPLOY_VAR),
            skip_confirm: want(SKIP_CONFIRM_VAR),
            local_setup: want(LOCAL_SETUP_VAR),
            container_runtime: vars
                .get(RUNTIME_VAR)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| "docker".to_string()),
        }
    }

    /// Environment passed into build containers, in a stable order
    pub fn container_env(&self) -> Vec<(String, String)> {
        let mut env = vec![("MIRROR".to_string(), self.mirror.clone())];
        env.extend(
            self.forwarded
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if let Some(initial) = &self.initial_deploy {
            env.push((INITIAL_DEPLOY_VAR.to_string(), initial.clone()));
        }
        env
    }
}
