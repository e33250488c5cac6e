//! Terminal presentation of build progress

use crate::utils;
use boxflow_build::BuildReporter;
use boxflow_container::ContainerError;
use boxflow_core::BuildTarget;
use colored::Colorize;

pub struct CliReporter;

impl BuildReporter for CliReporter {
    fn validating(&self, name: &str) {
        println!("{} {}", "checking".dimmed(), name);
    }

    fn missing(&self, name: &str, error: &ContainerError) {
        println!("[{}] {}", name.cyan(), error.to_string().red());
    }

    fn skipped(&self, name: &str) {
        println!("[{}] {}", name.cyan(), "skipped".yellow());
    }

    fn building(&self, target: &BuildTarget, image: &str) {
        utils::big_banner(&format!("building {} from {}", target.name, image));
    }

    fn run_error(&self, name: &str, error: &ContainerError) {
        eprintln!("[{}] {} {}", name.cyan(), "could not start:".red(), error);
    }

    fn finished(&self, name: &str, ok: bool) {
        if ok {
            utils::banner(&format!("{}: {}", name, "success".green()));
        } else {
            utils::banner(&format!("{}: {}", name, "FAILED".red().bold()));
        }
    }
}
