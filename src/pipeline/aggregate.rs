//! Stateless filters and grouped averages that feed the charts.
//!
//! Every helper takes the table by reference and returns a new value; the
//! input is never modified.
//!
//! Row filters read the full record of each row, so they may test a column
//! a projection has hidden. The projection itself carries over to the
//! result unchanged. Only [`group_average`] reads the visible columns, and
//! it rejects hidden ones.

use std::collections::BTreeMap;

use serde::Serialize;

use super::error::AggregationError;
use super::record::Vehicle;
use super::stats::mean;
use super::table::{Column, Table, Value};

/// Rows whose `column` value is one of `allowed_values`, order preserved.
///
/// An empty `allowed_values` yields an empty table.
pub fn filter_by_categories(table: &Table, column: Column, allowed_values: &[Value]) -> Table {
    table.filter_rows(|v| allowed_values.contains(&v.value(column)))
}

/// Rows whose numeric `column` lies in `low..=high`. Missing or
/// non-numeric cells never match.
pub fn filter_by_range(table: &Table, column: Column, low: f64, high: f64) -> Table {
    table.filter_rows(|v| {
        v.value(column)
            .as_f64()
            .is_some_and(|x| x >= low && x <= high)
    })
}

/// `first.0 == first.1 AND second.0 == second.1`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairPredicate {
    pub first: (Column, Value),
    pub second: (Column, Value),
}

impl PairPredicate {
    pub fn new(first: (Column, Value), second: (Column, Value)) -> Self {
        Self { first, second }
    }

    fn matches(&self, vehicle: &Vehicle) -> bool {
        vehicle.value(self.first.0) == self.first.1 && vehicle.value(self.second.0) == self.second.1
    }
}

/// Rows matching at least one predicate, each row once and in source
/// order, exposing only `value_columns`.
pub fn filter_by_conjunctive_pairs(
    table: &Table,
    pairs: &[PairPredicate],
    value_columns: &[Column],
) -> Table {
    table
        .filter_rows(|v| pairs.iter().any(|pair| pair.matches(v)))
        .select(value_columns)
}

/// One group of a [`GroupAverages`] result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    /// Group key, one value per group column
    pub key: Vec<Value>,
    /// Mean of the non-missing values in the group
    pub mean: f64,
    /// Number of values that went into the mean
    pub count: usize,
}

/// Chart-ready result of [`group_average`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverages {
    pub group_columns: Vec<Column>,
    pub value_column: Column,
    pub rows: Vec<GroupAverage>,
}

impl GroupAverages {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Mean for an exact key, if that group exists
    pub fn mean_for(&self, key: &[Value]) -> Option<f64> {
        self.rows.iter().find(|r| r.key == key).map(|r| r.mean)
    }
}

/// Mean of `value_column` for each observed combination of `group_columns`.
///
/// Rows with a missing key value are left out, as are groups without a
/// single non-missing value. Groups come out in key order; odometer ranges
/// sort by mileage.
pub fn group_average(
    table: &Table,
    group_columns: &[Column],
    value_column: Column,
) -> Result<GroupAverages, AggregationError> {
    for &column in group_columns.iter().chain(std::iter::once(&value_column)) {
        table.require(column)?;
    }

    let mut groups: BTreeMap<Vec<Value>, Vec<f64>> = BTreeMap::new();
    for vehicle in table.rows() {
        let key: Vec<Value> = group_columns.iter().map(|&c| vehicle.value(c)).collect();
        if key.iter().any(Value::is_missing) {
            continue;
        }
        let values = groups.entry(key).or_default();
        if let Some(x) = vehicle.value(value_column).as_f64() {
            values.push(x);
        }
    }

    let rows = groups
        .into_iter()
        .filter_map(|(key, values)| {
            let count = values.len();
            mean(values).map(|mean| GroupAverage { key, mean, count })
        })
        .collect();

    Ok(GroupAverages {
        group_columns: group_columns.to_vec(),
        value_column,
        rows,
    })
}
