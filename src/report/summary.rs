//! Cleaning summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::CleaningReport;

/// Count cell, colored when nonzero
fn count_cell(count: usize, nonzero: Color) -> Cell {
    Cell::new(count).fg(if count == 0 { Color::White } else { nonzero })
}

fn format_fill(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}", v))
}

/// Build the summary table for a cleaning run
pub fn cleaning_table(report: &CleaningReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![Cell::new("📁 Rows Read"), Cell::new(report.rows_read)]);
    table.add_row(vec![
        Cell::new("💲 Dropped (Price Bounds)"),
        count_cell(report.dropped_price, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("🛣️  Dropped (Odometer Limit)"),
        count_cell(report.dropped_odometer, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("🔁 Dropped (Duplicates)"),
        count_cell(report.dropped_duplicates, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "🧩 Filled Odometer (median {})",
            format_fill(report.odometer_median)
        )),
        count_cell(report.filled.odometer, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "🧩 Filled Cylinders (mode {})",
            format_fill(report.cylinders_mode)
        )),
        count_cell(report.filled.cylinders, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("🧩 Filled Model Year / Paint Color"),
        Cell::new(format!(
            "{} / {}",
            report.filled.model_year, report.filled.paint_color
        )),
    ]);
    table.add_row(vec![
        Cell::new("🧩 Filled 4WD Flag"),
        count_cell(report.filled.is_4wd, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("⚠️  Coercion Warnings"),
        count_cell(report.warnings.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("✅ Rows Kept"),
        Cell::new(report.rows_kept)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);

    table
}

/// Print the cleaning summary, followed by coercion warnings per column
pub fn display_cleaning_summary(report: &CleaningReport) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("CLEANING SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    // Indent the table
    for line in cleaning_table(report).to_string().lines() {
        println!("    {}", line);
    }

    let by_column = report.warnings_by_column();
    if !by_column.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Cells that could not be read as numbers").yellow(),
            style(format!("({})", report.warnings.len())).dim()
        );
        for (column, count) in by_column {
            println!("        {} {} {}", style("•").dim(), column, style(format!("({})", count)).dim());
        }
        if let Some(first) = report.warnings.first() {
            println!("        {} e.g. {}", style("•").dim(), style(first).dim());
        }
    }
}
