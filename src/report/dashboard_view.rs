//! Terminal rendering and JSON payload for the dashboard

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Table};
use console::style;

use crate::dashboard::{BarChart, Chart, Dashboard, DataTableView, Histogram, ScatterPlot};
use crate::utils::print_info;

fn new_table(headers: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn money(value: f64) -> String {
    format!("${:.0}", value)
}

/// Preview table of the cleaned dataset
pub fn table_view(view: &DataTableView) -> Table {
    let mut table = new_table(view.columns.clone());
    for row in &view.rows {
        table.add_row(row.iter().map(Cell::new));
    }
    table
}

/// Histogram as one row per non-empty bin, one count column per series
pub fn histogram_table(histogram: &Histogram) -> Table {
    let mut headers = vec![histogram.x_label.clone()];
    headers.extend(histogram.series.iter().map(|s| s.name.clone()));
    let mut table = new_table(headers);

    for (i, bin) in histogram.bins.iter().enumerate() {
        let counts: Vec<usize> = histogram.series.iter().map(|s| s.counts[i]).collect();
        if counts.iter().all(|&n| n == 0) {
            continue;
        }
        let mut row = vec![Cell::new(format!("{:.0} - {:.0}", bin.start, bin.end))];
        row.extend(
            counts
                .into_iter()
                .map(|n| Cell::new(n).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    table
}

/// Bars as (x, series, average) rows
pub fn bar_table(chart: &BarChart) -> Table {
    let mut headers = vec![chart.x_label.clone()];
    if let Some(legend) = &chart.legend_title {
        headers.push(legend.clone());
    }
    headers.push(chart.y_label.clone());
    let mut table = new_table(headers);

    for bar in &chart.bars {
        let mut row = vec![Cell::new(&bar.x)];
        if chart.legend_title.is_some() {
            row.push(Cell::new(bar.series.as_deref().unwrap_or_default()));
        }
        row.push(Cell::new(money(bar.y)).set_alignment(CellAlignment::Right));
        table.add_row(row);
    }
    table
}

/// Scatter plots are summarized per odometer tick band
pub fn scatter_table(plot: &ScatterPlot) -> Table {
    let mut table = new_table(vec![
        plot.x_label.clone(),
        "Points".to_string(),
        "Min Price".to_string(),
        "Max Price".to_string(),
    ]);

    for band in plot.x_ticks.windows(2) {
        let (low, high) = (&band[0], &band[1]);
        let last = high.value == plot.x_ticks.last().map_or(f64::NAN, |t| t.value);
        let prices: Vec<f64> = plot
            .points
            .iter()
            .filter(|p| p.x >= low.value && (p.x < high.value || (last && p.x <= high.value)))
            .map(|p| p.y)
            .collect();
        if prices.is_empty() {
            continue;
        }
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        table.add_row(vec![
            Cell::new(format!("{} - {}", low.label, high.label)),
            Cell::new(prices.len()).set_alignment(CellAlignment::Right),
            Cell::new(money(min)).set_alignment(CellAlignment::Right),
            Cell::new(money(max)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn chart_table(chart: &Chart) -> Table {
    match chart {
        Chart::Histogram(h) => histogram_table(h),
        Chart::Bar(b) => bar_table(b),
        Chart::Scatter(s) => scatter_table(s),
    }
}

/// Print the table preview and every chart section
pub fn display_dashboard(dashboard: &Dashboard) {
    println!();
    println!(
        "    {} {}",
        style("🚗").cyan(),
        style("CLEANED DATASET OVERVIEW").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    print_indented(&table_view(&dashboard.table_view));
    println!(
        "    {}",
        style(format!(
            "Showing {} of {} rows",
            dashboard.table_view.rows.len(),
            dashboard.table_view.total_rows
        ))
        .dim()
    );

    for section in &dashboard.sections {
        println!();
        println!(
            "    {} {}",
            style("📊").cyan(),
            style(&section.heading).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!("    {}", style(section.chart.title()).dim());

        if section.chart.is_empty() {
            print_info("No vehicles match the current selection");
            continue;
        }
        print_indented(&chart_table(&section.chart));
    }
}

/// Serialize the dashboard for an external renderer
pub fn dashboard_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("Failed to serialize dashboard to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{AxisTick, Bar, HistogramBin, HistogramSeries, ScatterPoint};
    use crate::pipeline::{Column, Value};

    #[test]
    fn test_histogram_table_skips_empty_bins() {
        let histogram = Histogram {
            title: "t".to_string(),
            x_label: "Days Listed".to_string(),
            y_label: "Number of Vehicles".to_string(),
            value_column: Column::DaysListed,
            color_column: Column::Manufacturer,
            bins: vec![
                HistogramBin { start: 0.0, end: 10.0 },
                HistogramBin { start: 10.0, end: 20.0 },
                HistogramBin { start: 20.0, end: 30.0 },
            ],
            series: vec![HistogramSeries {
                name: "ford".to_string(),
                counts: vec![2, 0, 1],
            }],
        };
        let rendered = histogram_table(&histogram).to_string();
        assert!(rendered.contains("0 - 10"));
        assert!(!rendered.contains("10 - 20"));
        assert!(rendered.contains("ford"));
    }

    #[test]
    fn test_bar_table_formats_money() {
        let chart = BarChart {
            title: "t".to_string(),
            x_label: "Vehicle Type".to_string(),
            y_label: "Average Price (USD)".to_string(),
            legend_title: Some("Transmission Type".to_string()),
            bars: vec![Bar {
                x: Value::from("suv"),
                series: Some("automatic".to_string()),
                y: 15_000.4,
            }],
        };
        let rendered = bar_table(&chart).to_string();
        assert!(rendered.contains("$15000"));
        assert!(rendered.contains("automatic"));
    }

    #[test]
    fn test_scatter_table_includes_last_tick() {
        let tick = |value: f64, label: &str| AxisTick {
            value,
            label: label.to_string(),
        };
        let point = |x: f64, y: f64| ScatterPoint {
            x,
            y,
            color: None,
            manufacturer: None,
            model: None,
        };
        let plot = ScatterPlot {
            title: "t".to_string(),
            x_label: "Odometer".to_string(),
            y_label: "Price".to_string(),
            x_ticks: vec![tick(0.0, "0k"), tick(50_000.0, "50k"), tick(100_000.0, "100k")],
            points: vec![point(10.0, 9_000.0), point(100_000.0, 3_000.0)],
        };
        let rendered = scatter_table(&plot).to_string();
        assert!(rendered.contains("0k - 50k"));
        assert!(rendered.contains("50k - 100k"));
        assert!(rendered.contains("$3000"));
    }
}
