//! Immutable, typed table of cleaned vehicle listings

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;

use super::bins::OdometerRange;
use super::error::AggregationError;
use super::record::Vehicle;

/// Every typed column of the vehicle table, source and derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Price,
    ModelYear,
    Model,
    Condition,
    Cylinders,
    Odometer,
    Transmission,
    #[serde(rename = "type")]
    Type,
    PaintColor,
    #[serde(rename = "is_4wd")]
    Is4wd,
    DaysListed,
    Manufacturer,
    OdometerRange,
}

impl Column {
    /// All columns in table-view order
    pub const ALL: [Column; 13] = [
        Column::Price,
        Column::ModelYear,
        Column::Model,
        Column::Condition,
        Column::Cylinders,
        Column::Odometer,
        Column::Transmission,
        Column::Type,
        Column::PaintColor,
        Column::Is4wd,
        Column::DaysListed,
        Column::Manufacturer,
        Column::OdometerRange,
    ];

    /// Columns that must be present in the source file
    pub const REQUIRED: [Column; 11] = [
        Column::Price,
        Column::ModelYear,
        Column::Model,
        Column::Condition,
        Column::Cylinders,
        Column::Odometer,
        Column::Transmission,
        Column::Type,
        Column::PaintColor,
        Column::Is4wd,
        Column::DaysListed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Price => "price",
            Column::ModelYear => "model_year",
            Column::Model => "model",
            Column::Condition => "condition",
            Column::Cylinders => "cylinders",
            Column::Odometer => "odometer",
            Column::Transmission => "transmission",
            Column::Type => "type",
            Column::PaintColor => "paint_color",
            Column::Is4wd => "is_4wd",
            Column::DaysListed => "days_listed",
            Column::Manufacturer => "manufacturer",
            Column::OdometerRange => "odometer_range",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("Unknown column '{}'", s))
    }
}

/// A single typed cell.
///
/// Values of the same variant compare naturally; across variants the
/// order is `Missing < Integer < Number < Text < Range`. Columns never mix
/// variants other than `Missing`, so this only settles where missing cells
/// sort.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Integer(i64),
    Number(f64),
    Text(String),
    Range(OdometerRange),
}

impl Value {
    pub fn text(s: Option<&str>) -> Self {
        s.map_or(Value::Missing, |s| Value::Text(s.to_string()))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell, if it holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Number(x) if !x.is_nan() => Some(*x),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Missing => 0,
            Value::Integer(_) => 1,
            Value::Number(_) => 2,
            Value::Text(_) => 3,
            Value::Range(_) => 4,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Range(a), Value::Range(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Missing => {}
            Value::Integer(n) => n.hash(state),
            Value::Number(x) => x.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Range(r) => r.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Range(r) => f.write_str(r.label()),
        }
    }
}

/// Cleaned listings plus the set of columns this view exposes.
///
/// A table is never modified in place; filters and projections return new
/// tables. Projection only narrows the visible columns, the rows keep their
/// full records.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    extra_columns: Vec<String>,
    rows: Vec<Vehicle>,
}

impl Table {
    /// Build a table exposing every typed column
    pub fn new(rows: Vec<Vehicle>, extra_columns: Vec<String>) -> Self {
        Self {
            columns: Column::ALL.to_vec(),
            extra_columns,
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Passthrough source columns, in source order
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn rows(&self) -> &[Vehicle] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Typed cell at `row`, `None` when the row is out of bounds
    pub fn value(&self, row: usize, column: Column) -> Option<Value> {
        self.rows.get(row).map(|v| v.value(column))
    }

    /// Restrict the visible columns, keeping the requested order. Columns
    /// this table does not already expose are ignored, so a projection can
    /// only narrow.
    pub fn select(&self, columns: &[Column]) -> Table {
        Table {
            columns: columns
                .iter()
                .copied()
                .filter(|c| self.has_column(*c))
                .collect(),
            extra_columns: self.extra_columns.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Distinct non-missing values of a column in order of first appearance
    pub fn distinct(&self, column: Column) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|v| v.value(column))
            .filter(|value| !value.is_missing())
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }

    /// Largest numeric value in a column
    pub fn numeric_max(&self, column: Column) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|v| v.value(column).as_f64())
            .fold(None, |max, x| Some(max.map_or(x, |m: f64| m.max(x))))
    }

    pub(crate) fn require(&self, column: Column) -> Result<(), AggregationError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(AggregationError::ColumnNotSelected(column))
        }
    }

    /// New table with the rows matching `keep`, order preserved
    pub(crate) fn filter_rows<F>(&self, keep: F) -> Table
    where
        F: Fn(&Vehicle) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            extra_columns: self.extra_columns.clone(),
            rows: self.rows.iter().filter(|v| keep(v)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(column.name().parse::<Column>().unwrap(), column);
        }
        assert!("fuel".parse::<Column>().is_err());
    }

    #[test]
    fn test_column_serializes_as_header_name() {
        for column in Column::ALL {
            let json = serde_json::to_string(&column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.name()));
        }
    }

    #[test]
    fn test_select_never_widens() {
        let table = Table::new(Vec::new(), Vec::new());
        let narrow = table.select(&[Column::Type, Column::Price]);
        let widened = narrow.select(&[Column::Manufacturer, Column::Price]);
        assert_eq!(widened.columns(), [Column::Price]);
        assert!(widened.require(Column::Manufacturer).is_err());
    }

    #[test]
    fn test_value_ordering() {
        let mut values = vec![
            Value::Text("suv".into()),
            Value::Missing,
            Value::Text("sedan".into()),
            Value::Integer(3),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Missing,
                Value::Integer(3),
                Value::Text("sedan".into()),
                Value::Text("suv".into()),
            ]
        );
        assert_eq!(Value::Number(1.5), Value::Number(1.5));
        assert_ne!(Value::Integer(2), Value::Number(2.0));
    }

    #[test]
    fn test_value_numeric_view() {
        assert_eq!(Value::Integer(4).as_f64(), Some(4.0));
        assert_eq!(Value::Number(f64::NAN).as_f64(), None);
        assert_eq!(Value::Text("4".into()).as_f64(), None);
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_value_serializes_plainly() {
        let json = serde_json::to_string(&vec![
            Value::Missing,
            Value::Integer(7),
            Value::Text("suv".into()),
            Value::Range(OdometerRange::Over250K),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,7,"suv","250K+"]"#);
    }
}
