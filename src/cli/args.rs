//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::dashboard::SelectionPolicy;

/// Lotview - clean a used-vehicle sales dataset and chart it
#[derive(Parser, Debug)]
#[command(name = "lotview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Use the default selections instead of prompting for each chart
    #[arg(long, default_value = "false")]
    pub no_interactive: bool,

    /// Write the dashboard as JSON to stdout instead of terminal tables.
    /// Implies --no-interactive.
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Require the comparison slots of a chart to hold different values.
    /// By default slots are independent and may repeat a selection.
    #[arg(long, default_value = "false")]
    pub distinct_selections: bool,

    /// Number of cleaned rows shown in the table preview (0 shows all)
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,
}

impl Cli {
    pub fn selection_policy(&self) -> SelectionPolicy {
        if self.distinct_selections {
            SelectionPolicy::Distinct
        } else {
            SelectionPolicy::AllowDuplicates
        }
    }

    /// Prompts only make sense for terminal output
    pub fn interactive(&self) -> bool {
        !self.no_interactive && !self.json
    }

    /// Preview limit, `None` for the whole table
    pub fn preview_limit(&self) -> Option<usize> {
        (self.preview_rows > 0).then_some(self.preview_rows)
    }
}
