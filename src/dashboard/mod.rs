//! Dashboard module - session selections and the chart sections they drive

pub mod charts;
pub mod session;

pub use charts::*;
pub use session::*;

use serde::Serialize;

use crate::pipeline::{AggregationError, Column, Table};

/// Tabular preview of the cleaned dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows in the full table; `rows` may hold fewer
    pub total_rows: usize,
}

impl DataTableView {
    /// Typed columns first, then passthrough columns; at most `limit` rows
    pub fn build(table: &Table, limit: Option<usize>) -> Self {
        let typed: Vec<Column> = table.columns().to_vec();
        let mut columns: Vec<String> = typed.iter().map(|c| c.name().to_string()).collect();
        columns.extend(table.extra_columns().iter().cloned());

        let rows = table
            .rows()
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|v| {
                typed
                    .iter()
                    .map(|&c| v.display(c))
                    .chain(v.extras.iter().map(|e| e.clone().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows,
            total_rows: table.len(),
        }
    }
}

/// Titled dashboard section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSection {
    pub heading: String,
    pub chart: Chart,
}

/// Everything one page render needs: the table view and the seven charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub table_view: DataTableView,
    pub sections: Vec<ChartSection>,
}

impl Dashboard {
    /// Run every chart section against the cleaned table for one session
    pub fn build(
        table: &Table,
        session: &SessionContext,
        preview_rows: Option<usize>,
    ) -> Result<Self, AggregationError> {
        let section = |heading: &str, chart: Chart| ChartSection {
            heading: heading.to_string(),
            chart,
        };

        let sections = vec![
            section(
                "Distribution of Days Listed by Manufacturer",
                days_listed_histogram(table, session),
            ),
            section("Price Distribution by Manufacturer", price_histogram(table, session)),
            section(
                "Average Price by Odometer Range and Vehicle Type",
                odometer_type_bars(table, session)?,
            ),
            section(
                "Scatter Plot: Price vs. Odometer by Vehicle Condition",
                condition_scatter(table, session),
            ),
            section(
                "Average Price by Odometer Range for Manufacturers and Vehicle Types",
                comparison_bars(table, session)?,
            ),
            section(
                "Average Price vs. Model Year for Selected Manufacturer and Vehicle Type",
                model_year_bars(table, session)?,
            ),
            section(
                "Average Price by Vehicle Type and Transmission",
                transmission_bars(table, session)?,
            ),
        ];

        Ok(Self {
            table_view: DataTableView::build(table, preview_rows),
            sections,
        })
    }

    /// Sections whose selection matched nothing
    pub fn empty_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.chart.is_empty())
            .map(|s| s.heading.as_str())
            .collect()
    }
}
