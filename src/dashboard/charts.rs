//! Chart-ready data for each dashboard section.
//!
//! Charts hold plain tables of numbers and labels plus the titles and axis
//! text a renderer needs. An empty selection produces an empty chart, not
//! an error.

use serde::Serialize;

use crate::pipeline::{
    filter_by_categories, filter_by_conjunctive_pairs, filter_by_range, group_average,
    AggregationError, Column, GroupAverages, PairPredicate, Table, Value,
};

use super::session::{SessionContext, SlotGroup};

/// Bins in the days-listed histogram
pub const DAYS_LISTED_BINS: usize = 20;

/// Bins in the price histogram
pub const PRICE_BINS: usize = 30;

/// Fixed x-axis ticks of the price/odometer scatter plot
pub const ODOMETER_TICKS: [(f64, &str); 7] = [
    (0.0, "0k"),
    (50_000.0, "50k"),
    (100_000.0, "100k"),
    (150_000.0, "150k"),
    (200_000.0, "200k"),
    (250_000.0, "250k"),
    (300_000.0, "300k"),
];

const COUNT_LABEL: &str = "Number of Vehicles";
const AVERAGE_PRICE_LABEL: &str = "Average Price (USD)";
const ODOMETER_RANGE_LABEL: &str = "Odometer Range (Miles)";

/// Half-open histogram bin `[start, end)`; the last bin is closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
}

/// Counts for one colored series, aligned with [`Histogram::bins`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    pub counts: Vec<usize>,
}

/// Overlapping histogram, one series per color value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub value_column: Column,
    pub color_column: Column,
    pub bins: Vec<HistogramBin>,
    pub series: Vec<HistogramSeries>,
}

impl Histogram {
    /// Bin `value_column` into `bin_count` equal-width bins spanning the
    /// observed values, with one series per distinct `color_column` value.
    pub fn build(
        table: &Table,
        value_column: Column,
        color_column: Column,
        bin_count: usize,
        title: &str,
        x_label: &str,
    ) -> Self {
        let observations: Vec<(Value, f64)> = table
            .rows()
            .iter()
            .filter_map(|v| Some((v.value(color_column), v.value(value_column).as_f64()?)))
            .filter(|(color, _)| !color.is_missing())
            .collect();

        let bins = equal_width_bins(observations.iter().map(|(_, x)| *x), bin_count);
        let series = table
            .distinct(color_column)
            .into_iter()
            .map(|color| {
                let mut counts = vec![0; bins.len()];
                for (_, x) in observations.iter().filter(|(c, _)| *c == color) {
                    if let Some(i) = bin_index(&bins, *x) {
                        counts[i] += 1;
                    }
                }
                HistogramSeries {
                    name: color.to_string(),
                    counts,
                }
            })
            .filter(|s| s.counts.iter().any(|&n| n > 0))
            .collect();

        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: COUNT_LABEL.to_string(),
            value_column,
            color_column,
            bins,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Observations counted across every series
    pub fn total(&self) -> usize {
        self.series.iter().flat_map(|s| &s.counts).sum()
    }
}

fn equal_width_bins<I: Iterator<Item = f64>>(values: I, bin_count: usize) -> Vec<HistogramBin> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    if bin_count == 0 || min > max {
        return Vec::new();
    }
    if min == max {
        return vec![HistogramBin { start: min, end: min + 1.0 }];
    }
    let width = (max - min) / bin_count as f64;
    (0..bin_count)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bin_count { max } else { min + width * (i + 1) as f64 },
        })
        .collect()
}

fn bin_index(bins: &[HistogramBin], x: f64) -> Option<usize> {
    let first = bins.first()?;
    let last = bins.last()?;
    if x < first.start || x > last.end {
        return None;
    }
    let width = (last.end - first.start) / bins.len() as f64;
    if width <= 0.0 {
        return Some(0);
    }
    Some((((x - first.start) / width) as usize).min(bins.len() - 1))
}

/// One bar: an x category, an optional series, and its height
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub y: f64,
}

/// Bar chart, grouped side by side when bars carry a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Turn grouped averages into bars: the key at `x_index` is the x
    /// category and `series` names the group the bar belongs to.
    fn from_averages<F>(averages: &GroupAverages, x_index: usize, series: F) -> Vec<Bar>
    where
        F: Fn(&[Value]) -> Option<String>,
    {
        averages
            .rows
            .iter()
            .map(|row| Bar {
                x: row.key[x_index].clone(),
                series: series(&row.key),
                y: row.mean,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Distinct series names in first-appearance order
    pub fn series_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.bars.iter().filter_map(|b| b.series.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// One scatter point with its hover details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub color: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

/// Labeled axis tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

/// Price against odometer, colored by condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<AxisTick>,
    pub points: Vec<ScatterPoint>,
}

impl ScatterPlot {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Histogram(Histogram),
    Bar(BarChart),
    Scatter(ScatterPlot),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(h) => &h.title,
            Chart::Bar(b) => &b.title,
            Chart::Scatter(s) => &s.title,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Histogram(h) => h.is_empty(),
            Chart::Bar(b) => b.is_empty(),
            Chart::Scatter(s) => s.is_empty(),
        }
    }
}

/// Distribution of days listed for the selected manufacturers
pub fn days_listed_histogram(table: &Table, session: &SessionContext) -> Chart {
    let selected = filter_by_categories(
        table,
        Column::Manufacturer,
        &session.slot_values(SlotGroup::DaysListedManufacturers),
    );
    Chart::Histogram(Histogram::build(
        &selected,
        Column::DaysListed,
        Column::Manufacturer,
        DAYS_LISTED_BINS,
        "Distribution of Days Listed by Selected Manufacturers",
        "Days Listed",
    ))
}

/// Price distribution for the selected manufacturers
pub fn price_histogram(table: &Table, session: &SessionContext) -> Chart {
    let selected = filter_by_categories(
        table,
        Column::Manufacturer,
        &session.slot_values(SlotGroup::PriceManufacturers),
    );
    Chart::Histogram(Histogram::build(
        &selected,
        Column::Price,
        Column::Manufacturer,
        PRICE_BINS,
        "Price Distribution for Selected Manufacturers",
        "Price (USD)",
    ))
}

/// Average price per odometer range, one series per selected type
pub fn odometer_type_bars(table: &Table, session: &SessionContext) -> Result<Chart, AggregationError> {
    let selected = filter_by_categories(table, Column::Type, &session.slot_values(SlotGroup::OdometerTypes))
        .select(&[Column::Type, Column::OdometerRange, Column::Price]);
    let averages = group_average(&selected, &[Column::Type, Column::OdometerRange], Column::Price)?;

    Ok(Chart::Bar(BarChart {
        title: "Average Price by Odometer Range for Selected Vehicle Types".to_string(),
        x_label: ODOMETER_RANGE_LABEL.to_string(),
        y_label: AVERAGE_PRICE_LABEL.to_string(),
        legend_title: Some("Type".to_string()),
        bars: BarChart::from_averages(&averages, 1, |key| Some(key[0].to_string())),
    }))
}

/// Price against odometer for the selected condition (all when unset)
pub fn condition_scatter(table: &Table, session: &SessionContext) -> Chart {
    let (selected, subject) = match session.condition() {
        Some(condition) => (
            filter_by_categories(table, Column::Condition, &[Value::from(condition)]),
            condition.to_string(),
        ),
        None => (table.clone(), "All Conditions".to_string()),
    };

    let points = selected
        .rows()
        .iter()
        .map(|v| ScatterPoint {
            x: v.odometer,
            y: v.price,
            color: v.condition.clone(),
            manufacturer: v.manufacturer.clone(),
            model: v.model.clone(),
        })
        .collect();

    Chart::Scatter(ScatterPlot {
        title: format!("Price vs. Odometer Reading for {}", subject),
        x_label: "Odometer (Thousands of Miles)".to_string(),
        y_label: "Price (USD)".to_string(),
        x_ticks: ODOMETER_TICKS
            .iter()
            .map(|&(value, label)| AxisTick {
                value,
                label: label.to_string(),
            })
            .collect(),
        points,
    })
}

/// Average price per odometer range for each (manufacturer, type) pair
pub fn comparison_bars(table: &Table, session: &SessionContext) -> Result<Chart, AggregationError> {
    let pairs: Vec<PairPredicate> = session
        .comparison_pairs()
        .iter()
        .map(|p| {
            PairPredicate::new(
                (Column::Manufacturer, Value::from(p.manufacturer.as_str())),
                (Column::Type, Value::from(p.vehicle_type.as_str())),
            )
        })
        .collect();
    let group_columns = [Column::Manufacturer, Column::Type, Column::OdometerRange];
    let selected = filter_by_conjunctive_pairs(
        table,
        &pairs,
        &[Column::Manufacturer, Column::Type, Column::OdometerRange, Column::Price],
    );
    let averages = group_average(&selected, &group_columns, Column::Price)?;

    Ok(Chart::Bar(BarChart {
        title: "Average Price by Odometer Range for Selected Manufacturers and Vehicle Types"
            .to_string(),
        x_label: ODOMETER_RANGE_LABEL.to_string(),
        y_label: AVERAGE_PRICE_LABEL.to_string(),
        legend_title: Some("Manufacturer and Vehicle Type".to_string()),
        bars: BarChart::from_averages(&averages, 2, |key| {
            Some(format!("{} ({})", key[0], key[1]))
        }),
    }))
}

/// Average price per model year for one manufacturer and type
pub fn model_year_bars(table: &Table, session: &SessionContext) -> Result<Chart, AggregationError> {
    let (low, high) = session.model_years();
    let (subject, selected) = match session.model_year_subject() {
        Some((manufacturer, vehicle_type)) => {
            let by_type = filter_by_categories(table, Column::Type, &[Value::from(vehicle_type)]);
            let by_maker = filter_by_categories(&by_type, Column::Manufacturer, &[Value::from(manufacturer)]);
            (
                format!("{} {}", manufacturer, vehicle_type),
                filter_by_range(&by_maker, Column::ModelYear, low as f64, high as f64),
            )
        }
        None => (String::new(), filter_by_categories(table, Column::Type, &[])),
    };
    let averages = group_average(&selected, &[Column::ModelYear], Column::Price)?;

    Ok(Chart::Bar(BarChart {
        title: format!("Average Price vs. Model Year for {}", subject),
        x_label: "Model Year".to_string(),
        y_label: AVERAGE_PRICE_LABEL.to_string(),
        legend_title: None,
        bars: BarChart::from_averages(&averages, 0, |_| None),
    }))
}

/// Average price per type, one series per transmission
pub fn transmission_bars(table: &Table, session: &SessionContext) -> Result<Chart, AggregationError> {
    let types: Vec<Value> = session
        .transmission_types()
        .iter()
        .map(|t| Value::from(t.as_str()))
        .collect();
    let selected = filter_by_categories(table, Column::Type, &types)
        .select(&[Column::Type, Column::Transmission, Column::Price]);
    let averages = group_average(&selected, &[Column::Type, Column::Transmission], Column::Price)?;

    Ok(Chart::Bar(BarChart {
        title: "Average Price by Vehicle Type and Transmission Type".to_string(),
        x_label: "Vehicle Type".to_string(),
        y_label: AVERAGE_PRICE_LABEL.to_string(),
        legend_title: Some("Transmission Type".to_string()),
        bars: BarChart::from_averages(&averages, 0, |key| Some(key[1].to_string())),
    }))
}
