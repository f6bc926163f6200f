//! Colored operator output for qntm-setup
//!
//! Uses owo-colors for terminal colors and indicatif for spinners. Everything
//! the operator sees goes through here so the session, the git mirror and the
//! setup hook runner share one visual language.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::Write;
use std::time::Duration;

/// Print an action header (blue, bold)
/// Example: "==> Installing hero-banner"
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Print a sub-action (cyan arrow)
/// Example: "  -> copy"
pub fn sub_action(step: &str) {
    println!("  {} {}", "->".cyan(), step);
}

/// Print a detail line (dimmed)
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
}

/// Print a success message (green)
/// Example: "==> hero-banner installed"
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Print a skip message (dimmed)
/// Example: "==> directive already present, skipping"
pub fn skip(message: &str) {
    println!("{} {}", "==>".dimmed(), message.dimmed());
}

/// Print one component row for `qntm-setup list`
pub fn list_item(name: &str, status: &str, is_installed: bool) {
    if is_installed {
        println!("  {} {}", name.green(), status.dimmed());
    } else {
        println!("  {} {}", name, status.dimmed());
    }
}

/// Forward a chunk of setup hook stdout.
///
/// Chunks are not line aligned, so each one is written as-is behind a prefix
/// rather than split into lines.
pub fn hook_stdout(hook: &str, chunk: &str) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "{} {}", format!("{hook}:").dimmed(), chunk);
    if !chunk.ends_with('\n') {
        let _ = writeln!(out);
    }
    let _ = out.flush();
}

/// Forward a chunk of setup hook stderr.
pub fn hook_stderr(hook: &str, chunk: &str) {
    let mut err = std::io::stderr().lock();
    let _ = write!(err, "{} {}", format!("{hook}:").yellow(), chunk);
    if !chunk.ends_with('\n') {
        let _ = writeln!(err);
    }
    let _ = err.flush();
}

/// Create a spinner for git and other blocking operations
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner and clear it
pub fn progress_done(pb: ProgressBar) {
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_creation() {
        let pb = spinner("cloning wp-blocks");
        progress_done(pb);
    }

    #[test]
    fn test_hook_output_accepts_partial_chunks() {
        hook_stdout("init.js", "half a li");
        hook_stdout("init.js", "ne\n");
        hook_stderr("init.js", "warn");
    }
}
