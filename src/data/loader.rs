//! Table Loader Module
//! Reads CSV files with Polars and spreadsheets with calamine into a DataFrame.

use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[source] PolarsError),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Spreadsheet contains no worksheets")]
    EmptyWorkbook,
    #[error("Failed to build table: {0}")]
    Frame(#[source] PolarsError),
}

impl LoaderError {
    /// Inline message shown next to the upload controls.
    pub fn user_message(&self) -> String {
        format!("Error loading file: {}", self)
    }
}

/// Extensions offered in the upload dialog.
pub const UPLOAD_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xls", "ods"];

/// Supported upload formats, chosen by file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            FileFormat::Csv
        } else {
            FileFormat::Spreadsheet
        }
    }
}

/// Load an optional upload. An absent path is not an error and yields `None`.
pub fn load_data(path: Option<&Path>) -> Result<Option<DataFrame>, LoaderError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let result = match FileFormat::from_path(path) {
        FileFormat::Csv => load_csv(path),
        FileFormat::Spreadsheet => load_spreadsheet(path),
    };

    match result {
        Ok(df) => {
            info!(
                "loaded {} ({} rows, {} columns)",
                path.display(),
                df.height(),
                df.width()
            );
            Ok(Some(df))
        }
        Err(e) => {
            error!("failed to load {}: {}", path.display(), e);
            Err(e)
        }
    }
}

/// Read a comma-delimited file with a header row.
pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(LoaderError::Csv)
}

/// Read the first worksheet of a workbook. Its first row is the header.
pub fn load_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoaderError::EmptyWorkbook)??;
    range_to_frame(&range)
}

fn range_to_frame(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns: Vec<Column> = unique_headers(header)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(idx)).collect();
            infer_column(name, &cells)
        })
        .collect();

    DataFrame::new(columns).map_err(LoaderError::Frame)
}

/// Blank headers become `Unnamed: <index>`; repeats get a `.1`, `.2`, ... suffix.
fn unique_headers(header: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                other => other.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Integral numbers become Int64, other numbers Float64, anything else String.
fn infer_column(name: String, cells: &[Option<&Data>]) -> Column {
    let mut all_numeric = true;
    let mut all_integral = true;

    for cell in cells.iter().flatten() {
        match cell {
            Data::Empty | Data::Int(_) => {}
            Data::Float(v) => {
                if v.fract() != 0.0 {
                    all_integral = false;
                }
            }
            _ => {
                all_numeric = false;
                break;
            }
        }
    }

    if all_numeric && all_integral {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Some(Data::Int(v)) => Some(*v),
                Some(Data::Float(v)) => Some(*v as i64),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Some(Data::Int(v)) => Some(*v as f64),
                Some(Data::Float(v)) => Some(*v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                None | Some(Data::Empty) => None,
                Some(Data::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}
