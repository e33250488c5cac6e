//! Deploy orchestrator
//!
//! Walks the requested targets once, deploying each through its family's
//! script. Families with a `can-batch` marker only get a copy per target and
//! are deployed for real in one `-deferred` call at the end, followed by a
//! single cache invalidation for every deferred target.

use crate::deferred::DeferredGroups;
use crate::error::{DeployError, Result};
use crate::outcome::ScriptOutcome;
use boxflow_core::{Catalog, Invocation, ProjectPaths, Settings};
use colored::Colorize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Run the deploy scripts
    pub copy: bool,
    /// Run the cache invalidation tool
    pub invalidate: bool,
    /// Pass `-initial` to per-target deploys
    pub initial: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            copy: true,
            invalidate: true,
            initial: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub deployed: Vec<String>,
    /// Targets whose deploy exited with the non-fatal code
    pub non_fatal: Vec<String>,
    /// Unknown targets, missing scripts, or everything under `PT_SKIP_DEPLOY`
    pub skipped: Vec<String>,
    /// Deferred targets per family
    pub deferred: BTreeMap<String, Vec<String>>,
    /// Names whose invalidation failed
    pub invalidation_failures: Vec<String>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.non_fatal.is_empty() && self.invalidation_failures.is_empty()
    }
}

pub struct Publisher<'a> {
    catalog: &'a Catalog,
    paths: &'a ProjectPaths,
    settings: &'a Settings,
    options: PublishOptions,
}

impl<'a> Publisher<'a> {
    pub fn new(
        catalog: &'a Catalog,
        paths: &'a ProjectPaths,
        settings: &'a Settings,
        options: PublishOptions,
    ) -> Self {
        Self {
            catalog,
            paths,
            settings,
            options,
        }
    }

    /// Deploy `names`, or every catalog target when empty
    ///
    /// Stops at the first fatal script exit; everything up to that point has
    /// already happened.
    #[instrument(skip_all, fields(copy = self.options.copy, invalidate = self.options.invalidate))]
    pub async fn publish(&self, names: &[String]) -> Result<PublishReport> {
        let names = self.catalog.select(names);
        let mut report = PublishReport::default();

        if self.settings.skip_deploy {
            info!("PT_SKIP_DEPLOY set, skipping deploy");
            report.skipped = names;
            return Ok(report);
        }

        let mut groups = DeferredGroups::new();
        for name in &names {
            self.publish_one(name, &mut groups, &mut report).await?;
        }

        self.publish_deferred(&groups, &mut report).await?;
        Ok(report)
    }

    async fn publish_one(
        &self,
        name: &str,
        groups: &mut DeferredGroups,
        report: &mut PublishReport,
    ) -> Result<()> {
        let target = match self.catalog.lookup(name) {
            Ok(target) => target,
            Err(e) => {
                warn!(target = %name, error = %e, "Skipping unknown target");
                report.skipped.push(name.to_string());
                return Ok(());
            }
        };

        let family = target.os_family();
        let script = self.paths.deploy_script(family);
        if !script.is_file() {
            info!(target = %name, script = %script.display(), "No deploy script, skipping");
            report.skipped.push(name.to_string());
            return Ok(());
        }

        let batched = self.paths.can_batch_marker(family).exists();
        if batched {
            groups.record(family, &script, name)?;
            debug!(target = %name, family, "Deferred to batched deploy");
        }

        if self.options.copy {
            let mut invocation = Invocation::new(&script).arg(name);
            if self.options.initial {
                invocation = invocation.arg("-initial");
            }
            if batched {
                invocation = invocation.arg("-copy-only");
            }

            println!("[{}] {}", name.cyan(), invocation);
            match self.run_script(&invocation).await? {
                ScriptOutcome::Succeeded => report.deployed.push(name.to_string()),
                ScriptOutcome::NonFatal => {
                    warn!(target = %name, "Deploy failed, continuing");
                    println!("[{}] {}", name.cyan(), "deploy failed (non-fatal)".yellow());
                    report.non_fatal.push(name.to_string());
                }
                ScriptOutcome::Fatal(code) => {
                    return Err(DeployError::ScriptFailed {
                        target: name.to_string(),
                        code,
                    });
                }
            }
        }

        if self.options.invalidate && !batched {
            self.invalidate(&[name.to_string()], report).await;
        }
        Ok(())
    }

    async fn publish_deferred(
        &self,
        groups: &DeferredGroups,
        report: &mut PublishReport,
    ) -> Result<()> {
        if groups.is_empty() {
            return Ok(());
        }

        for (family, group) in groups.iter() {
            report
                .deferred
                .insert(family.to_string(), group.targets.clone());

            let invocation = Invocation::new(&group.script)
                .arg("-deferred")
                .args(&group.targets);
            println!("[{}] {}", family.cyan(), invocation);
            match self.run_script(&invocation).await? {
                ScriptOutcome::Succeeded => {}
                ScriptOutcome::NonFatal => {
                    warn!(family, "Deferred deploy failed, continuing");
                    report.deployed.retain(|name| !group.targets.contains(name));
                    report.non_fatal.extend(group.targets.iter().cloned());
                }
                ScriptOutcome::Fatal(code) => {
                    return Err(DeployError::DeferredFailed {
                        family: family.to_string(),
                        code,
                    });
                }
            }
        }

        if self.options.invalidate {
            self.invalidate(&groups.all_targets(), report).await;
        }
        Ok(())
    }

    async fn run_script(&self, invocation: &Invocation) -> Result<ScriptOutcome> {
        let status = invocation
            .command()
            .status()
            .await
            .map_err(|source| DeployError::Spawn {
                command: invocation.to_string(),
                source,
            })?;
        let outcome = ScriptOutcome::from_status(status);
        debug!(command = %invocation, ?outcome, "Deploy script finished");
        Ok(outcome)
    }

    /// Failures here never stop the deploy
    async fn invalidate(&self, names: &[String], report: &mut PublishReport) {
        let invocation = Invocation::new(self.paths.invalidate_tool()).args(names);
        println!("{} {}", "invalidate:".dimmed(), invocation);

        let failed = match invocation.command().status().await {
            Ok(status) if status.success() => false,
            Ok(status) => {
                warn!(command = %invocation, %status, "Cache invalidation failed");
                true
            }
            Err(e) => {
                warn!(command = %invocation, error = %e, "Cache invalidation could not start");
                true
            }
        };
        if failed {
            report.invalidation_failures.extend(names.iter().cloned());
        }
    }
}
