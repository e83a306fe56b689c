//! Cleaning: typed parsing, missing-value fills, bounds filters,
//! de-duplication and derived columns.

use std::collections::HashSet;
use std::path::Path;

use super::bins::OdometerRange;
use super::error::{CoercionWarning, DataLoadError};
use super::loader::{read_source, RawTable};
use super::record::{manufacturer_of, ModelYear, Vehicle, UNKNOWN};
use super::stats::{median, mode};
use super::table::{Column, Table};

/// Exclusive price bounds in USD
pub const PRICE_BOUNDS: (f64, f64) = (500.0, 100_000.0);

/// Listings at or above this mileage are dropped
pub const ODOMETER_LIMIT: f64 = 500_000.0;

/// Per-column counts of absent cells replaced by a default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillCounts {
    pub model_year: usize,
    pub paint_color: usize,
    pub odometer: usize,
    pub cylinders: usize,
    pub is_4wd: usize,
}

/// What cleaning did to the source, for the load summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub odometer_median: Option<f64>,
    pub cylinders_mode: Option<f64>,
    pub filled: FillCounts,
    pub dropped_price: usize,
    pub dropped_odometer: usize,
    pub dropped_duplicates: usize,
    pub rows_kept: usize,
    pub warnings: Vec<CoercionWarning>,
}

impl CleaningReport {
    /// Coercion warning counts per column, in column order
    pub fn warnings_by_column(&self) -> Vec<(Column, usize)> {
        Column::ALL
            .iter()
            .map(|&c| (c, self.warnings.iter().filter(|w| w.column == c).count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

/// Cleaned table together with the report of how it was produced
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub table: Table,
    pub report: CleaningReport,
}

/// Load a dataset file and clean it into an immutable table
pub fn load_and_clean(path: &Path) -> Result<Table, DataLoadError> {
    load_and_clean_with_report(path).map(|cleaned| cleaned.table)
}

/// Like [`load_and_clean`], also returning the cleaning report
pub fn load_and_clean_with_report(path: &Path) -> Result<CleanedDataset, DataLoadError> {
    let raw = read_source(path)?;
    clean(&raw)
}

type Parsed<T> = Result<Option<T>, CoercionWarning>;

/// Parse a numeric cell. Blank cells and NaN are absent; anything else that
/// is not a finite number is a coercion failure.
fn parse_number(raw: Option<&str>, row: usize, column: Column) -> Parsed<f64> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(text) => text,
    };
    match text.parse::<f64>() {
        Ok(x) if x.is_nan() => Ok(None),
        Ok(x) if x.is_finite() => Ok(Some(x)),
        _ => Err(CoercionWarning {
            row,
            column,
            raw: text.to_string(),
        }),
    }
}

/// Parse a whole-number cell, accepting decimal spellings such as "2011.0"
fn parse_integer(raw: Option<&str>, row: usize, column: Column) -> Parsed<i64> {
    match parse_number(raw, row, column)? {
        None => Ok(None),
        Some(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Ok(Some(x as i64)),
        Some(_) => Err(CoercionWarning {
            row,
            column,
            raw: raw.unwrap_or_default().trim().to_string(),
        }),
    }
}

/// Parse a yes/no flag: any number (nonzero is true) or `true`/`false` in
/// any letter case, which is how boolean columns read as text.
fn parse_flag(raw: Option<&str>, row: usize, column: Column) -> Parsed<bool> {
    match raw.map(str::trim) {
        Some(text) if text.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(text) if text.eq_ignore_ascii_case("false") => Ok(Some(false)),
        _ => Ok(parse_number(raw, row, column)?.map(|flag| flag != 0.0)),
    }
}

fn parse_text(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_string)
}

/// Resolve a parsed cell: absent cells take `fill`, failures are recorded
/// and become missing.
fn resolve<T>(
    parsed: Parsed<T>,
    fill: Option<T>,
    fill_count: &mut usize,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<T> {
    match parsed {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            if fill.is_some() {
                *fill_count += 1;
            }
            fill
        }
        Err(warning) => {
            warnings.push(warning);
            None
        }
    }
}

fn cell(raw: &RawTable, column: Column, row: usize) -> Option<&str> {
    raw.column(column.name())
        .and_then(|cells| cells.get(row))
        .and_then(|c| c.as_deref())
}

/// Clean an already-read source.
///
/// Fill values (odometer median, cylinders mode) come from the raw parsed
/// data before any row is filtered. Fills apply to absent cells only; a cell
/// that failed to parse stays missing.
pub fn clean(raw: &RawTable) -> Result<CleanedDataset, DataLoadError> {
    let missing = raw.missing_required();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    let height = raw.height();
    let raw_numbers = |column: Column| -> Vec<f64> {
        (0..height)
            .filter_map(|row| parse_number(cell(raw, column, row), row, column).ok().flatten())
            .collect()
    };
    let mut report = CleaningReport {
        rows_read: height,
        odometer_median: median(&raw_numbers(Column::Odometer)),
        cylinders_mode: mode(&raw_numbers(Column::Cylinders)),
        ..Default::default()
    };

    let extra_headers = raw.extra_headers();
    let extra_cells: Vec<&[Option<String>]> = extra_headers
        .iter()
        .filter_map(|h| raw.column(h))
        .collect();

    let (min_price, max_price) = PRICE_BOUNDS;
    let mut candidates = Vec::with_capacity(height);
    for row in 0..height {
        let listing = parse_row(raw, row, &mut report);

        let price = match listing.price {
            Some(p) if p > min_price && p < max_price => p,
            _ => {
                report.dropped_price += 1;
                continue;
            }
        };
        let odometer = match listing.odometer {
            Some(miles) if miles < ODOMETER_LIMIT => miles,
            _ => {
                report.dropped_odometer += 1;
                continue;
            }
        };

        let extras = extra_cells.iter().map(|cells| cells[row].clone()).collect();
        candidates.push(listing.into_vehicle(price, odometer, extras));
    }

    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        candidates.iter().map(|v| seen.insert(v.identity())).collect()
    };
    let rows: Vec<Vehicle> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(vehicle, first)| first.then_some(vehicle))
        .collect();

    report.rows_kept = rows.len();
    report.dropped_duplicates = height - report.dropped_price - report.dropped_odometer - rows.len();

    if rows.is_empty() {
        return Err(DataLoadError::Empty { read: height });
    }

    Ok(CleanedDataset {
        table: Table::new(rows, extra_headers),
        report,
    })
}

/// A source row after typed parsing and fills, before the bounds filters
struct ParsedRow {
    price: Option<f64>,
    model_year: ModelYear,
    model: Option<String>,
    condition: Option<String>,
    cylinders: Option<f64>,
    odometer: Option<f64>,
    transmission: Option<String>,
    vehicle_type: Option<String>,
    paint_color: String,
    is_4wd: bool,
    days_listed: Option<i64>,
}

fn parse_row(raw: &RawTable, row: usize, report: &mut CleaningReport) -> ParsedRow {
    let warnings = &mut report.warnings;
    let filled = &mut report.filled;

    let price = resolve(
        parse_number(cell(raw, Column::Price, row), row, Column::Price),
        None,
        &mut 0,
        warnings,
    );

    let year_cell = parse_integer(cell(raw, Column::ModelYear, row), row, Column::ModelYear);
    if matches!(year_cell, Ok(None)) {
        filled.model_year += 1;
    }
    let model_year = resolve(year_cell, None, &mut 0, warnings)
        .and_then(|y| i32::try_from(y).ok())
        .map_or(ModelYear::Unknown, ModelYear::Year);

    let odometer = resolve(
        parse_number(cell(raw, Column::Odometer, row), row, Column::Odometer),
        report.odometer_median,
        &mut filled.odometer,
        warnings,
    );
    let cylinders = resolve(
        parse_number(cell(raw, Column::Cylinders, row), row, Column::Cylinders),
        report.cylinders_mode,
        &mut filled.cylinders,
        warnings,
    );
    let is_4wd = resolve(
        parse_flag(cell(raw, Column::Is4wd, row), row, Column::Is4wd),
        Some(false),
        &mut filled.is_4wd,
        warnings,
    )
    .unwrap_or(false);
    let days_listed = resolve(
        parse_integer(cell(raw, Column::DaysListed, row), row, Column::DaysListed),
        None,
        &mut 0,
        warnings,
    );

    let paint_color = parse_text(cell(raw, Column::PaintColor, row)).unwrap_or_else(|| {
        filled.paint_color += 1;
        UNKNOWN.to_string()
    });

    ParsedRow {
        price,
        model_year,
        model: parse_text(cell(raw, Column::Model, row)),
        condition: parse_text(cell(raw, Column::Condition, row)),
        cylinders,
        odometer,
        transmission: parse_text(cell(raw, Column::Transmission, row)),
        vehicle_type: parse_text(cell(raw, Column::Type, row)),
        paint_color,
        is_4wd,
        days_listed,
    }
}

impl ParsedRow {
    /// Finish a row that passed the bounds filters, deriving manufacturer
    /// and odometer range.
    fn into_vehicle(self, price: f64, odometer: f64, extras: Vec<Option<String>>) -> Vehicle {
        Vehicle {
            price,
            model_year: self.model_year,
            manufacturer: self.model.as_deref().and_then(manufacturer_of),
            model: self.model,
            condition: self.condition,
            cylinders: self.cylinders,
            odometer,
            transmission: self.transmission,
            vehicle_type: self.vehicle_type,
            paint_color: self.paint_color,
            is_4wd: self.is_4wd,
            days_listed: self.days_listed,
            odometer_range: OdometerRange::from_odometer(odometer),
            extras,
        }
    }
}
