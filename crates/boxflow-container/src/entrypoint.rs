//! In-container entry point
//!
//! The build inside the container is a chain of repository scripts joined
//! with `&&`, so the first failing step stops the build. This is the only
//! command line in boxflow that is interpreted by a shell.

use boxflow_core::{BuildTarget, ProjectPaths, shell_escape};

const PRESETUP_SCRIPT: &str = "vscripts/user.presetup.sh";
const DEPS_SCRIPT: &str = "vscripts/deps.py";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntrypointOptions {
    pub skip_os_update: bool,
    /// Machine-specific `os/ptlocal.<family>.sh` enablement
    pub local_setup: bool,
}

/// Ordered shell steps for one target
pub fn entrypoint_steps(
    target: &BuildTarget,
    paths: &ProjectPaths,
    options: EntrypointOptions,
) -> Vec<String> {
    let family = target.os_family();
    // Attach happens after the detached start; the pause keeps early output
    let mut steps = vec!["sleep 1".to_string()];

    if options.local_setup && paths.local_setup_script(family).is_file() {
        steps.push(format!("os/ptlocal.{}.sh", family));
    }
    if !options.skip_os_update {
        steps.push(format!("os/update.{}.sh", family));
    }
    if let Some(repo) = &target.repo {
        steps.push(format!(
            "os/gnupg-repos.{}.sh {}",
            family,
            shell_escape(repo)
        ));
    }

    let mut deps = format!(
        "{} --ostype {} --boxname {} --run-inside",
        DEPS_SCRIPT,
        shell_escape(family),
        shell_escape(&target.name)
    );
    match &target.gpg_command {
        Some(gpg) => {
            steps.push(format!("env GPG={} {}", shell_escape(gpg), PRESETUP_SCRIPT));
            deps.push_str(&format!(" --gpg {}", shell_escape(gpg)));
        }
        None => steps.push(PRESETUP_SCRIPT.to_string()),
    }
    steps.push(deps);

    steps
}

/// `/bin/bash -c <steps joined with &&>`
pub fn entrypoint_command(steps: &[String]) -> Vec<String> {
    vec![
        "/bin/bash".to_string(),
        "-c".to_string(),
        steps.join(" && "),
    ]
}
