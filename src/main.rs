//! Lotview: Used-Vehicle Sales Dashboard CLI
//!
//! Cleans a vehicle listings dataset and renders the dashboard charts as
//! terminal tables, or emits them as JSON for an external renderer.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use lotview::cli::{prompt_selections, Cli};
use lotview::dashboard::{Dashboard, SessionContext};
use lotview::pipeline::load_and_clean_with_report;
use lotview::report::{dashboard_json, display_cleaning_summary, display_dashboard};
use lotview::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_step_header, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // JSON goes to stdout untouched by any status output
    if cli.json {
        return run_json(&cli);
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, cli.selection_policy(), cli.interactive());

    // Step 1: Load and clean
    print_step_header(1, "Load & Clean Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading and cleaning dataset...");
    let cleaned = match load_and_clean_with_report(&cli.input) {
        Ok(cleaned) => cleaned,
        Err(err) => {
            finish_with_failure(&spinner, "Dataset could not be loaded");
            return Err(err).with_context(|| format!("Failed to load {}", cli.input.display()));
        }
    };
    finish_with_success(
        &spinner,
        &format!("{} listings ready", cleaned.table.len()),
    );
    println!(
        "      {}",
        style(format!("Elapsed: {:.2?}", step_start.elapsed())).dim()
    );
    display_cleaning_summary(&cleaned.report);

    // Step 2: Selections
    print_step_header(2, "Chart Selections");
    let mut session = SessionContext::with_defaults(&cleaned.table, cli.selection_policy());
    if cli.interactive() {
        prompt_selections(&mut session)?;
    } else {
        print_info("Using default selections");
    }

    // Step 3: Charts
    print_step_header(3, "Dashboard");
    let dashboard = Dashboard::build(&cleaned.table, &session, cli.preview_limit())
        .context("Failed to assemble dashboard charts")?;
    display_dashboard(&dashboard);

    let empty = dashboard.empty_sections();
    println!();
    if empty.is_empty() {
        print_success(&format!("All {} charts have data", dashboard.sections.len()));
    } else {
        print_warning(&format!(
            "{} chart(s) have no data for the current selections",
            empty.len()
        ));
    }

    print_completion();
    Ok(())
}

fn run_json(cli: &Cli) -> Result<()> {
    let cleaned = load_and_clean_with_report(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    let session = SessionContext::with_defaults(&cleaned.table, cli.selection_policy());
    let dashboard = Dashboard::build(&cleaned.table, &session, cli.preview_limit())
        .context("Failed to assemble dashboard charts")?;
    println!("{}", dashboard_json(&dashboard)?);
    Ok(())
}
