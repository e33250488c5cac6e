use colored::Colorize;
use std::io::Write;

const FALLBACK_WIDTH: usize = 80;

fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|&cols| cols > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

fn rule(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// One line of text between two rules
pub fn banner(text: &str) {
    let line = rule('=', terminal_width());
    println!("{}", line.cyan());
    println!("{}", text);
    println!("{}", line.cyan());
}

/// Banner with padding, for the start of a long step
pub fn big_banner(text: &str) {
    let width = terminal_width();
    let line = rule('#', width);
    println!();
    println!("{}", line.cyan());
    println!("{}", "#".cyan());
    println!("{} {}", "#".cyan(), text.bold());
    println!("{}", "#".cyan());
    println!("{}", line.cyan());
    println!();
}

/// Final success/failure lists, printed even when one is empty
pub fn print_summary(succeeded: &[String], failed: &[String]) {
    println!();
    println!("{}", summary_counts(succeeded.len(), failed.len()).bold());
    println!("{} {:?}", "Success:".green().bold(), succeeded);
    println!("{} {:?}", "Failures:".red().bold(), failed);
}

fn summary_counts(succeeded: usize, failed: usize) -> String {
    format!("Done with any builds.  Success: {}  Failure: {}", succeeded, failed)
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is no
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N]: ", question);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
