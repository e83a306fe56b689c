//! Per-session selection state for the dashboard charts.
//!
//! Each session owns one [`SessionContext`]; the cleaned table itself is
//! shared and never touched. Selections are validated against the options
//! the table actually offers.

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::{Column, Table, Value};

/// Number of comparison slots in the multi-slot sections
pub const COMPARISON_SLOTS: usize = 3;

/// Lowest model year offered by the model-year slider
pub const MODEL_YEAR_FLOOR: i32 = 1929;

/// Initial model-year window, clamped into the slider bounds
pub const DEFAULT_MODEL_YEARS: (i32, i32) = (2000, 2024);

/// Whether sibling comparison slots may hold the same value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Slots are independent and may repeat a value
    #[default]
    AllowDuplicates,
    /// Slots in one section must all differ
    Distinct,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{value}' is not an available {column}")]
    UnknownOption { column: Column, value: String },

    #[error("'{value}' is already selected in another slot")]
    DuplicateSelection { value: String },

    #[error("Slot {index} does not exist (sections have 3 slots)")]
    NoSuchSlot { index: usize },

    #[error("Model year range {low}-{high} is outside {min}-{max} or reversed")]
    InvalidYearRange { low: i32, high: i32, min: i32, max: i32 },
}

/// Values the dropdowns and slider can offer, taken from the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions {
    pub manufacturers: Vec<String>,
    pub types: Vec<String>,
    pub conditions: Vec<String>,
    pub model_year_bounds: (i32, i32),
}

impl SelectionOptions {
    pub fn from_table(table: &Table) -> Self {
        let texts = |column: Column| -> Vec<String> {
            table
                .distinct(column)
                .into_iter()
                .filter_map(|value| match value {
                    Value::Text(s) => Some(s),
                    _ => None,
                })
                .collect()
        };
        let max_year = table
            .numeric_max(Column::ModelYear)
            .map_or(DEFAULT_MODEL_YEARS.1, |y| y as i32)
            .max(MODEL_YEAR_FLOOR);

        Self {
            manufacturers: texts(Column::Manufacturer),
            types: texts(Column::Type),
            conditions: texts(Column::Condition),
            model_year_bounds: (MODEL_YEAR_FLOOR, max_year),
        }
    }

    fn for_column(&self, column: Column) -> &[String] {
        match column {
            Column::Manufacturer => &self.manufacturers,
            Column::Type => &self.types,
            Column::Condition => &self.conditions,
            _ => &[],
        }
    }

    fn check(&self, column: Column, value: &str) -> Result<(), SelectionError> {
        if self.for_column(column).iter().any(|o| o == value) {
            Ok(())
        } else {
            Err(SelectionError::UnknownOption {
                column,
                value: value.to_string(),
            })
        }
    }
}

/// The three-slot dropdown groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotGroup {
    /// Manufacturers compared in the days-listed histogram
    DaysListedManufacturers,
    /// Manufacturers compared in the price histogram
    PriceManufacturers,
    /// Vehicle types compared by odometer range
    OdometerTypes,
}

impl SlotGroup {
    pub fn column(&self) -> Column {
        match self {
            SlotGroup::DaysListedManufacturers | SlotGroup::PriceManufacturers => {
                Column::Manufacturer
            }
            SlotGroup::OdometerTypes => Column::Type,
        }
    }
}

/// Manufacturer and vehicle type compared side by side by odometer range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonPair {
    pub manufacturer: String,
    pub vehicle_type: String,
}

/// Current selections of one dashboard session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    policy: SelectionPolicy,
    options: SelectionOptions,
    days_listed_manufacturers: Vec<String>,
    price_manufacturers: Vec<String>,
    odometer_types: Vec<String>,
    condition: Option<String>,
    comparison_pairs: Vec<ComparisonPair>,
    model_year_manufacturer: Option<String>,
    model_year_type: Option<String>,
    model_years: (i32, i32),
    transmission_types: Vec<String>,
}

/// Default picks for a slot group: options at `indices`, clamped to the
/// last option. Under `Distinct` the clamped repeats are dropped.
fn default_slots(options: &[String], indices: [usize; COMPARISON_SLOTS], policy: SelectionPolicy) -> Vec<String> {
    if options.is_empty() {
        return Vec::new();
    }
    let mut picks: Vec<String> = indices
        .iter()
        .map(|&i| options[i.min(options.len() - 1)].clone())
        .collect();
    if policy == SelectionPolicy::Distinct {
        let mut seen = Vec::new();
        picks.retain(|p| {
            let fresh = !seen.contains(p);
            seen.push(p.clone());
            fresh
        });
    }
    picks
}

impl SessionContext {
    /// Start a session with the same initial picks as a freshly opened page
    pub fn with_defaults(table: &Table, policy: SelectionPolicy) -> Self {
        let options = SelectionOptions::from_table(table);

        // Plain dropdowns open on the first option; under Distinct they
        // spread over the first options instead.
        let first_indices = match policy {
            SelectionPolicy::AllowDuplicates => [0, 0, 0],
            SelectionPolicy::Distinct => [0, 1, 2],
        };
        let spread = [0, 1, 2];

        let manufacturers = default_slots(&options.manufacturers, spread, SelectionPolicy::AllowDuplicates);
        let types = default_slots(&options.types, spread, SelectionPolicy::AllowDuplicates);
        let mut comparison_pairs: Vec<ComparisonPair> = manufacturers
            .into_iter()
            .zip(types)
            .map(|(manufacturer, vehicle_type)| ComparisonPair {
                manufacturer,
                vehicle_type,
            })
            .collect();
        if policy == SelectionPolicy::Distinct {
            let mut seen = Vec::new();
            comparison_pairs.retain(|p| {
                let fresh = !seen.contains(p);
                seen.push(p.clone());
                fresh
            });
        }

        let (min_year, max_year) = options.model_year_bounds;
        let low = DEFAULT_MODEL_YEARS.0.clamp(min_year, max_year);
        let high = DEFAULT_MODEL_YEARS.1.clamp(low, max_year);

        Self {
            policy,
            days_listed_manufacturers: default_slots(&options.manufacturers, first_indices, policy),
            price_manufacturers: default_slots(&options.manufacturers, first_indices, policy),
            odometer_types: default_slots(&options.types, spread, policy),
            condition: options.conditions.first().cloned(),
            comparison_pairs,
            model_year_manufacturer: options.manufacturers.first().cloned(),
            model_year_type: options.types.first().cloned(),
            model_years: (low, high),
            transmission_types: options.types.first().cloned().into_iter().collect(),
            options,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    pub fn slots(&self, group: SlotGroup) -> &[String] {
        match group {
            SlotGroup::DaysListedManufacturers => &self.days_listed_manufacturers,
            SlotGroup::PriceManufacturers => &self.price_manufacturers,
            SlotGroup::OdometerTypes => &self.odometer_types,
        }
    }

    /// Selected slot values as table values
    pub fn slot_values(&self, group: SlotGroup) -> Vec<Value> {
        self.slots(group).iter().map(|s| Value::from(s.as_str())).collect()
    }

    /// Put `value` into slot `index` of a group. Setting the slot right after
    /// the last filled one appends a slot.
    pub fn set_slot(&mut self, group: SlotGroup, index: usize, value: &str) -> Result<(), SelectionError> {
        self.options.check(group.column(), value)?;
        let policy = self.policy;
        let slots = match group {
            SlotGroup::DaysListedManufacturers => &mut self.days_listed_manufacturers,
            SlotGroup::PriceManufacturers => &mut self.price_manufacturers,
            SlotGroup::OdometerTypes => &mut self.odometer_types,
        };
        if index >= COMPARISON_SLOTS || index > slots.len() {
            return Err(SelectionError::NoSuchSlot { index });
        }
        if policy == SelectionPolicy::Distinct
            && slots.iter().enumerate().any(|(i, s)| i != index && s == value)
        {
            return Err(SelectionError::DuplicateSelection {
                value: value.to_string(),
            });
        }
        if index == slots.len() {
            slots.push(value.to_string());
        } else {
            slots[index] = value.to_string();
        }
        Ok(())
    }

    /// Condition shown in the scatter plot; `None` shows every condition
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn set_condition(&mut self, condition: Option<&str>) -> Result<(), SelectionError> {
        if let Some(value) = condition {
            self.options.check(Column::Condition, value)?;
        }
        self.condition = condition.map(str::to_string);
        Ok(())
    }

    pub fn comparison_pairs(&self) -> &[ComparisonPair] {
        &self.comparison_pairs
    }

    pub fn set_comparison_pair(
        &mut self,
        index: usize,
        manufacturer: &str,
        vehicle_type: &str,
    ) -> Result<(), SelectionError> {
        self.options.check(Column::Manufacturer, manufacturer)?;
        self.options.check(Column::Type, vehicle_type)?;
        if index >= COMPARISON_SLOTS || index > self.comparison_pairs.len() {
            return Err(SelectionError::NoSuchSlot { index });
        }
        let pair = ComparisonPair {
            manufacturer: manufacturer.to_string(),
            vehicle_type: vehicle_type.to_string(),
        };
        if self.policy == SelectionPolicy::Distinct
            && self
                .comparison_pairs
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && *p == pair)
        {
            return Err(SelectionError::DuplicateSelection {
                value: format!("{} ({})", manufacturer, vehicle_type),
            });
        }
        if index == self.comparison_pairs.len() {
            self.comparison_pairs.push(pair);
        } else {
            self.comparison_pairs[index] = pair;
        }
        Ok(())
    }

    /// Manufacturer and type for the model-year chart
    pub fn model_year_subject(&self) -> Option<(&str, &str)> {
        Some((
            self.model_year_manufacturer.as_deref()?,
            self.model_year_type.as_deref()?,
        ))
    }

    pub fn set_model_year_subject(&mut self, manufacturer: &str, vehicle_type: &str) -> Result<(), SelectionError> {
        self.options.check(Column::Manufacturer, manufacturer)?;
        self.options.check(Column::Type, vehicle_type)?;
        self.model_year_manufacturer = Some(manufacturer.to_string());
        self.model_year_type = Some(vehicle_type.to_string());
        Ok(())
    }

    /// Inclusive model-year window
    pub fn model_years(&self) -> (i32, i32) {
        self.model_years
    }

    pub fn set_model_years(&mut self, low: i32, high: i32) -> Result<(), SelectionError> {
        let (min, max) = self.options.model_year_bounds;
        if low > high || low < min || high > max {
            return Err(SelectionError::InvalidYearRange { low, high, min, max });
        }
        self.model_years = (low, high);
        Ok(())
    }

    pub fn transmission_types(&self) -> &[String] {
        &self.transmission_types
    }

    /// Replace the multi-selection of types; repeats are dropped
    pub fn set_transmission_types<S: AsRef<str>>(&mut self, types: &[S]) -> Result<(), SelectionError> {
        let mut selected: Vec<String> = Vec::with_capacity(types.len());
        for t in types {
            let t = t.as_ref();
            self.options.check(Column::Type, t)?;
            if !selected.iter().any(|s| s == t) {
                selected.push(t.to_string());
            }
        }
        self.transmission_types = selected;
        Ok(())
    }
}
