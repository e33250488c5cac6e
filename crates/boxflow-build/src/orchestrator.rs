//! Two-phase build orchestration
//!
//! Every requested target is validated before any container starts, so an
//! unattended run cannot die half-way on a target that never had an image.

use crate::error::{BuildError, Result};
use crate::report::{BuildReport, BuildReporter};
use boxflow_container::{ContainerRunner, ContainerRuntime, resolve_image};
use boxflow_core::{BuildTarget, Catalog};
use std::fmt;
use tracing::{debug, info, warn};

/// Phase of a whole build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Pending,
    Validating,
    Running,
    Done,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildPhase::Pending => "pending",
            BuildPhase::Validating => "validating",
            BuildPhase::Running => "running",
            BuildPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Target that passed pre-flight, with the image it will run from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget<'c> {
    pub target: &'c BuildTarget,
    pub image: String,
}

pub struct BuildOrchestrator<'a, R, P> {
    catalog: &'a Catalog,
    runner: ContainerRunner<'a, R>,
    reporter: P,
    phase: BuildPhase,
}

impl<'a, R, P> BuildOrchestrator<'a, R, P>
where
    R: ContainerRuntime,
    P: BuildReporter,
{
    pub fn new(catalog: &'a Catalog, runner: ContainerRunner<'a, R>, reporter: P) -> Self {
        Self {
            catalog,
            runner,
            reporter,
            phase: BuildPhase::Pending,
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    fn enter(&mut self, phase: BuildPhase) {
        debug!(from = %self.phase, to = %phase, "Build phase change");
        self.phase = phase;
    }

    /// Validate and build `names`, or the whole catalog when empty
    pub async fn build(&mut self, names: &[String]) -> Result<BuildReport> {
        let names = self.catalog.select(names);
        let validated = self.preflight(&names).await?;
        Ok(self.run(validated).await)
    }

    /// Report every target as skipped without touching the runtime
    pub fn skip(&mut self, names: &[String]) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        for name in self.catalog.select(names) {
            self.catalog.lookup(&name)?;
            self.reporter.skipped(&name);
            report.skipped.push(name);
        }
        self.enter(BuildPhase::Done);
        Ok(report)
    }

    /// Resolve an image for every target
    ///
    /// An unknown name aborts immediately. Missing images are collected and
    /// turned into `BuildError::Preflight` once every target was checked.
    pub async fn preflight(&mut self, names: &[String]) -> Result<Vec<ValidatedTarget<'a>>> {
        self.enter(BuildPhase::Validating);
        let catalog = self.catalog;
        let mut validated = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            self.reporter.validating(name);
            let target = catalog.lookup(name)?;
            match resolve_image(self.runner.runtime(), target).await {
                Ok(image) => validated.push(ValidatedTarget { target, image }),
                Err(e) if e.is_missing_image() => {
                    self.reporter.missing(name, &e);
                    missing.push(name.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "Pre-flight failed");
            self.enter(BuildPhase::Done);
            return Err(BuildError::Preflight {
                okay: validated.iter().map(|v| v.target.name.clone()).collect(),
                missing,
            });
        }

        info!(targets = validated.len(), "Pre-flight passed");
        Ok(validated)
    }

    /// Build validated targets in order; per-target errors become failures
    pub async fn run(&mut self, validated: Vec<ValidatedTarget<'a>>) -> BuildReport {
        self.enter(BuildPhase::Running);
        let mut report = BuildReport::default();

        for ValidatedTarget { target, image } in validated {
            self.reporter.building(target, &image);
            let ok = match self.runner.run(target, &image).await {
                Ok(ok) => ok,
                Err(e) => {
                    warn!(target = %target.name, error = %e, "Build could not start");
                    self.reporter.run_error(&target.name, &e);
                    false
                }
            };
            self.reporter.finished(&target.name, ok);
            report.record(&target.name, ok);
        }

        self.enter(BuildPhase::Done);
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Builds finished"
        );
        report
    }
}
