mod commands;
mod reporter;
mod utils;

use boxflow_core::{Catalog, ProjectPaths, Settings};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boxflow")]
#[command(about = "Build packages in throwaway containers, then publish them", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known build targets
    List,
    /// Build targets inside containers
    Build(commands::build::BuildArgs),
    /// Deploy built targets and invalidate their cache entries
    Publish(commands::publish::PublishArgs),
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("boxflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let paths = ProjectPaths::new(boxflow_core::find_project_root()?);
    // must precede every environment read
    boxflow_core::apply_site_env(&paths)?;
    let settings = Settings::from_env();
    let catalog = Catalog::load(&paths.catalog())?;

    match cli.command {
        Commands::List => {
            commands::list::handle(&catalog);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Build(args) => commands::build::handle(&catalog, &paths, &settings, args).await,
        Commands::Publish(args) => {
            commands::publish::handle(&catalog, &paths, &settings, args).await
        }
        Commands::Version => unreachable!("Version is handled before project loading"),
    }
}
