//! Dataset loader for CSV and Parquet files
//!
//! Everything is read as text. Turning cells into numbers is the cleaning
//! step's job, so a stray "n/a" in a numeric column costs one cell instead
//! of the whole column.

use std::path::Path;

use polars::prelude::*;

use super::error::DataLoadError;
use super::table::Column;

/// Text-only view of the source file, one vector of cells per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
    height: usize,
}

impl RawTable {
    /// Build from headers and equally long columns of cells
    pub fn new(headers: Vec<String>, columns: Vec<Vec<Option<String>>>) -> Self {
        let height = columns.first().map_or(0, Vec::len);
        debug_assert!(columns.iter().all(|c| c.len() == height));
        Self {
            headers,
            columns,
            height,
        }
    }

    /// Convert a polars frame, casting every column to text
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let mut headers = Vec::with_capacity(df.width());
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let text = column.cast(&DataType::String)?;
            let cells: Vec<Option<String>> = text
                .str()?
                .into_iter()
                .map(|cell| cell.map(|s| s.to_string()))
                .collect();
            headers.push(column.name().to_string());
            columns.push(cells);
        }

        Ok(Self::new(headers, columns))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells of the column with the given header
    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Required columns absent from the header
    pub fn missing_required(&self) -> Vec<String> {
        Column::REQUIRED
            .iter()
            .filter(|c| !self.headers.iter().any(|h| h == c.name()))
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Headers that are not typed columns, in source order
    pub fn extra_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| h.parse::<Column>().is_err())
            .cloned()
            .collect()
    }
}

/// Read a dataset file (CSV or Parquet based on extension) as text
pub fn read_source(path: &Path) -> Result<RawTable, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::SourceMissing(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let unreadable = |source: PolarsError| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let lf = match extension.as_str() {
        // Schema inference off: every CSV column comes back as String
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .map_err(unreadable)?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(unreadable)?,
        _ => return Err(DataLoadError::UnsupportedFormat { extension }),
    };

    let df = lf.collect().map_err(unreadable)?;
    let raw = RawTable::from_dataframe(&df).map_err(unreadable)?;

    let missing = raw.missing_required();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    Ok(raw)
}
