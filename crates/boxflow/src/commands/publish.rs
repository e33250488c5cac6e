use crate::utils;
use boxflow_core::{Catalog, ProjectPaths, Settings};
use boxflow_publish::{PublishOptions, Publisher};
use clap::Args;
use colored::Colorize;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Targets to publish (default: all)
    pub targets: Vec<String>,
    /// First deploy to a fresh repository
    #[arg(long)]
    pub initial: bool,
    /// Do not run the deploy scripts
    #[arg(long)]
    pub no_copy: bool,
    /// Do not invalidate cache entries
    #[arg(long)]
    pub no_invalidate: bool,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn handle(
    catalog: &Catalog,
    paths: &ProjectPaths,
    settings: &Settings,
    args: PublishArgs,
) -> anyhow::Result<ExitCode> {
    let names = catalog.select(&args.targets);
    let options = PublishOptions {
        copy: !args.no_copy,
        invalidate: !args.no_invalidate,
        initial: args.initial,
    };

    println!("{}", format!("Publishing {} target(s):", names.len()).bold());
    for name in &names {
        println!("  • {}", name.cyan());
    }

    if !(args.yes || settings.skip_confirm || settings.skip_deploy) {
        println!();
        if !utils::confirm("Deploy these targets?")? {
            println!("{}", "Publish cancelled.".yellow());
            return Ok(ExitCode::SUCCESS);
        }
    }

    let publisher = Publisher::new(catalog, paths, settings, options);
    match publisher.publish(&names).await {
        Ok(report) => {
            for (family, targets) in &report.deferred {
                println!("  {} {}: {}", "deferred".dimmed(), family, targets.join(" "));
            }
            if !report.skipped.is_empty() {
                println!("{} {:?}", "Skipped:".yellow(), report.skipped);
            }
            if !report.non_fatal.is_empty() {
                println!("{} {:?}", "Failed (non-fatal):".yellow(), report.non_fatal);
            }
            if !report.invalidation_failures.is_empty() {
                println!(
                    "{} {:?}",
                    "Invalidation failed:".yellow(),
                    report.invalidation_failures
                );
            }
            println!("{}", "✓ Publish finished".green());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            Ok(ExitCode::from(code))
        }
    }
}
