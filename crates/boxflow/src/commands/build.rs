use crate::reporter::CliReporter;
use crate::utils;
use boxflow_build::{BuildError, BuildOrchestrator};
use boxflow_container::{ContainerRunner, DockerCli, RunnerOptions};
use boxflow_core::{Catalog, ProjectPaths, Settings};
use clap::Args;
use colored::Colorize;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Targets to build (default: all)
    pub targets: Vec<String>,
    /// Print the known targets and exit
    #[arg(short, long)]
    pub list: bool,
    /// Skip the os/update.<family>.sh step
    #[arg(long)]
    pub skip_os_update: bool,
    /// Keep containers of failed builds for inspection
    #[arg(short, long)]
    pub keep_failed_builds: bool,
}

pub async fn handle(
    catalog: &Catalog,
    paths: &ProjectPaths,
    settings: &Settings,
    args: BuildArgs,
) -> anyhow::Result<ExitCode> {
    if args.list {
        super::list::handle(catalog);
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = DockerCli::new(&settings.container_runtime);
    let runner = ContainerRunner::new(
        &runtime,
        paths,
        settings,
        RunnerOptions {
            skip_os_update: args.skip_os_update,
            keep_failed_builds: args.keep_failed_builds,
        },
    );
    let mut orchestrator = BuildOrchestrator::new(catalog, runner, CliReporter);

    let result = if settings.skip_build {
        println!("{}", "PT_SKIP_BUILD set, not building".yellow());
        orchestrator.skip(&args.targets)
    } else {
        orchestrator.build(&args.targets).await
    };

    let report = match result {
        Ok(report) => report,
        Err(e @ BuildError::Preflight { .. }) => {
            eprintln!("{} {}", "Pre-flight failed:".red().bold(), e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    utils::print_summary(&report.succeeded, &report.failed);
    if !report.is_success() {
        return Ok(ExitCode::FAILURE);
    }

    if !report.succeeded.is_empty() {
        println!();
        println!("{}", "Next, publish the results:".bold());
        let mut command = format!("{} publish", "boxflow".cyan());
        for name in &args.targets {
            command.push(' ');
            command.push_str(name);
        }
        println!("  {}", command);
    }
    Ok(ExitCode::SUCCESS)
}
