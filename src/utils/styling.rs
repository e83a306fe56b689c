//! Terminal styling utilities for the dashboard CLI

use console::{style, Emoji};
use std::path::Path;

use crate::dashboard::SelectionPolicy;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!("    {}", style("L O T V I E W").cyan().bold());
    println!(
        "    {}",
        style("Used-vehicle sales, cleaned and charted").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, policy: SelectionPolicy, interactive: bool) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    let policy_text = match policy {
        SelectionPolicy::AllowDuplicates => "repeats allowed",
        SelectionPolicy::Distinct => "distinct",
    };

    println!("    ┌{}┐", line);
    println!("    │ {}", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {} Input:      {}", FOLDER, truncate_path(input, 36));
    println!("    │  {} Selections: {}", LINK, style(policy_text).yellow());
    println!(
        "    │  {} Mode:       {}",
        INFO,
        style(if interactive { "interactive" } else { "defaults" }).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Dashboard ready!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short.csv", 20), "short.csv");
        assert_eq!(
            truncate_string("/very/long/path/vehicles_us.csv", 18),
            "...vehicles_us.csv"
        );
    }
}
