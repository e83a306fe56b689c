//! Typed vehicle listing produced by the cleaning pipeline

use std::fmt;

use serde::Serialize;

use super::bins::OdometerRange;
use super::table::{Column, Value};

/// Placeholder used for categorical cells that were absent in the source
pub const UNKNOWN: &str = "unknown";

/// Model year of a listing, or the "unknown" sentinel when the source had
/// none (or had something that is not a year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelYear {
    Year(i32),
    Unknown,
}

impl ModelYear {
    pub fn year(&self) -> Option<i32> {
        match self {
            ModelYear::Year(year) => Some(*year),
            ModelYear::Unknown => None,
        }
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelYear::Year(year) => write!(f, "{}", year),
            ModelYear::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for ModelYear {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModelYear::Year(year) => serializer.serialize_i32(*year),
            ModelYear::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// One cleaned listing.
///
/// `price` and `odometer` are always present: rows without them never
/// survive the bounds filter. Columns not listed here are kept verbatim in
/// `extras`, aligned with [`super::Table::extra_columns`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub price: f64,
    pub model_year: ModelYear,
    pub model: Option<String>,
    pub condition: Option<String>,
    pub cylinders: Option<f64>,
    pub odometer: f64,
    pub transmission: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub paint_color: String,
    pub is_4wd: bool,
    pub days_listed: Option<i64>,
    pub manufacturer: Option<String>,
    pub odometer_range: Option<OdometerRange>,
    #[serde(skip)]
    pub extras: Vec<Option<String>>,
}

/// Hashable view of every field of a [`Vehicle`], used for duplicate
/// detection. Floats compare by bit pattern.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct RowIdentity<'a> {
    price: u64,
    model_year: ModelYear,
    model: Option<&'a str>,
    condition: Option<&'a str>,
    cylinders: Option<u64>,
    odometer: u64,
    transmission: Option<&'a str>,
    vehicle_type: Option<&'a str>,
    paint_color: &'a str,
    is_4wd: bool,
    days_listed: Option<i64>,
    extras: &'a [Option<String>],
}

/// Take the first whitespace-delimited token of a model name
pub fn manufacturer_of(model: &str) -> Option<String> {
    model.split_whitespace().next().map(str::to_string)
}

impl Vehicle {
    /// Typed cell value for a column
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Price => Value::Number(self.price),
            Column::ModelYear => self
                .model_year
                .year()
                .map_or(Value::Missing, |y| Value::Integer(y as i64)),
            Column::Model => Value::text(self.model.as_deref()),
            Column::Condition => Value::text(self.condition.as_deref()),
            Column::Cylinders => self.cylinders.map_or(Value::Missing, Value::Number),
            Column::Odometer => Value::Number(self.odometer),
            Column::Transmission => Value::text(self.transmission.as_deref()),
            Column::Type => Value::text(self.vehicle_type.as_deref()),
            Column::PaintColor => Value::Text(self.paint_color.clone()),
            Column::Is4wd => Value::Integer(self.is_4wd as i64),
            Column::DaysListed => self.days_listed.map_or(Value::Missing, Value::Integer),
            Column::Manufacturer => Value::text(self.manufacturer.as_deref()),
            Column::OdometerRange => self.odometer_range.map_or(Value::Missing, Value::Range),
        }
    }

    /// Cell text for table views; the model year sentinel shows as
    /// "unknown" while other missing cells are blank.
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::ModelYear => self.model_year.to_string(),
            _ => self.value(column).to_string(),
        }
    }

    pub(crate) fn identity(&self) -> RowIdentity<'_> {
        RowIdentity {
            price: self.price.to_bits(),
            model_year: self.model_year,
            model: self.model.as_deref(),
            condition: self.condition.as_deref(),
            cylinders: self.cylinders.map(f64::to_bits),
            odometer: self.odometer.to_bits(),
            transmission: self.transmission.as_deref(),
            vehicle_type: self.vehicle_type.as_deref(),
            paint_color: &self.paint_color,
            is_4wd: self.is_4wd,
            days_listed: self.days_listed,
            extras: &self.extras,
        }
    }
}
