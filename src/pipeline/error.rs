//! Error and warning types for loading and querying the vehicle table.
//!
//! Loading failures are fatal and carry enough context to tell the user
//! which file or column is at fault. Coercion problems are not errors: they
//! are collected as [`CoercionWarning`]s and the affected cell becomes
//! missing.

use std::fmt;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use super::table::Column;

/// Fatal errors raised while turning a source file into a cleaned table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The source path does not exist.
    #[error("Dataset not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The file extension is not one we know how to read.
    #[error("Unsupported file format: {extension}. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// The reader failed (malformed file, permission denied, ...).
    #[error("Failed to read dataset {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// One or more required columns are absent from the header.
    #[error("Dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No rows remain, either in the source or after filtering.
    #[error("Dataset has no rows left after cleaning ({read} row(s) read)")]
    Empty { read: usize },
}

/// A cell that could not be parsed into its column's type.
///
/// The cell is treated as missing and loading continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    /// Zero-based row index in the source file (header excluded)
    pub row: usize,
    pub column: Column,
    /// The raw text that failed to parse
    pub raw: String,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}: could not read '{}' as a number in column '{}'",
            self.row, self.raw, self.column
        )
    }
}

/// Errors raised by the aggregation helpers when asked for a column the
/// table does not expose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("Column '{0}' is not part of this table's selected columns")]
    ColumnNotSelected(Column),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_columns_display() {
        let err = DataLoadError::MissingColumns(vec!["price".to_string(), "model".to_string()]);
        assert_eq!(
            err.to_string(),
            "Dataset is missing required column(s): price, model"
        );
    }

    #[test]
    fn test_empty_display() {
        let err = DataLoadError::Empty { read: 12 };
        assert_eq!(
            err.to_string(),
            "Dataset has no rows left after cleaning (12 row(s) read)"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = DataLoadError::UnsupportedFormat {
            extension: "xlsx".to_string(),
        };
        assert!(err.to_string().contains("Unsupported file format: xlsx"));
    }

    #[test]
    fn test_unreadable_has_source() {
        let err = DataLoadError::Unreadable {
            path: PathBuf::from("cars.csv"),
            source: PolarsError::NoData("empty".into()),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("cars.csv"));
    }

    #[test]
    fn test_coercion_warning_display() {
        let warning = CoercionWarning {
            row: 7,
            column: Column::Odometer,
            raw: "lots".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Row 7: could not read 'lots' as a number in column 'odometer'"
        );
    }

    #[test]
    fn test_aggregation_error_display() {
        let err = AggregationError::ColumnNotSelected(Column::Price);
        assert_eq!(
            err.to_string(),
            "Column 'price' is not part of this table's selected columns"
        );
    }
}
