//! # Tabular Input
//!
//! A small in-memory model of spreadsheet data and the readers that fill it.
//!
//! - `.xlsx` / `.xls` / `.ods` workbooks are read with `calamine`
//! - a directory of `.csv` files (one file per sheet, file stem = sheet name)
//!   is read with the `csv` crate
//!
//! The first row of every sheet is the header row. Typed access goes through
//! [`Sheet::first_f64`] (scalar fields, first data row) and
//! [`Sheet::column_f64`] (list fields, whole column with blanks dropped);
//! both fail with [`PaveError::MissingField`] or [`PaveError::InvalidInput`]
//! naming the column.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::tabular::{Cell, Sheet};
//!
//! let sheet = Sheet::new(
//!     "Subgrade",
//!     vec!["Modulus".to_string(), "CBR".to_string()],
//!     vec![vec![Cell::Number(3000.0), Cell::Number(10.0)]],
//! );
//! assert_eq!(sheet.first_f64("CBR").unwrap(), 10.0);
//! assert!(sheet.first_f64("Rainfall").is_err());
//! ```

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{PaveError, PaveResult};

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify raw text: blank is `Empty`, numeric text stays `Text` and is
    /// parsed lazily by [`Cell::as_f64`].
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Empty => None,
        }
    }

    fn display_value(&self) -> String {
        match self {
            Cell::Empty => "<empty>".to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            other => Cell::from_text(&other.to_string()),
        }
    }
}

/// A named sheet: header row plus data rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Sheet {
            name: name.into(),
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// Build a sheet whose first row is the header row.
    ///
    /// Fully blank data rows are dropped.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        let mut rows = grid.into_iter();
        let headers = rows
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|c| match c {
                Cell::Empty => String::new(),
                Cell::Number(n) => n.to_string(),
                Cell::Text(s) => s,
            })
            .collect();
        let rows = rows.filter(|r| !r.iter().all(Cell::is_empty)).collect();
        Sheet::new(name, headers, rows)
    }

    /// Parse CSV text (header row required) into a sheet
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> PaveResult<Self> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| {
                PaveError::file_error("parse csv", name.clone(), e.to_string())
            })?;
            grid.push(record.iter().map(Cell::from_text).collect());
        }
        Ok(Sheet::from_grid(name, grid))
    }

    fn column_index(&self, field: &str) -> PaveResult<usize> {
        self.headers
            .iter()
            .position(|h| h == field)
            .ok_or_else(|| PaveError::missing_field(field))
    }

    /// Scalar field: the value in the first data row of `field`
    pub fn first_f64(&self, field: &str) -> PaveResult<f64> {
        let idx = self.column_index(field)?;
        let cell = self
            .rows
            .first()
            .and_then(|row| row.get(idx))
            .unwrap_or(&Cell::Empty);

        if cell.is_empty() {
            return Err(PaveError::missing_field(field));
        }
        cell.as_f64()
            .ok_or_else(|| PaveError::invalid_input(field, cell.display_value(), "Value must be numeric"))
    }

    /// List field: every non-blank value in the `field` column, in row order
    pub fn column_f64(&self, field: &str) -> PaveResult<Vec<f64>> {
        let idx = self.column_index(field)?;
        let mut values = Vec::new();
        for row in &self.rows {
            let cell = row.get(idx).unwrap_or(&Cell::Empty);
            if cell.is_empty() {
                continue;
            }
            let value = cell.as_f64().ok_or_else(|| {
                PaveError::invalid_input(field, cell.display_value(), "Value must be numeric")
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// All sheets from one workbook (or one directory of CSV files)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Workbook { sheets }
    }

    /// Open a spreadsheet file or a directory of CSV sheets.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pave_core::tabular::Workbook;
    /// use std::path::Path;
    ///
    /// let workbook = Workbook::open(Path::new("inputs.xlsx"))?;
    /// println!("{} sheets", workbook.sheets.len());
    /// # Ok::<(), pave_core::errors::PaveError>(())
    /// ```
    pub fn open(path: &Path) -> PaveResult<Self> {
        let workbook = if path.is_dir() {
            Self::open_csv_dir(path)?
        } else {
            Self::open_spreadsheet(path)?
        };
        info!(
            "Workbook '{}' read successfully ({} sheets).",
            path.display(),
            workbook.sheets.len()
        );
        Ok(workbook)
    }

    fn open_spreadsheet(path: &Path) -> PaveResult<Self> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| PaveError::file_error("open workbook", path.display().to_string(), e.to_string()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| PaveError::file_error("read sheet", format!("{}:{}", path.display(), name), e.to_string()))?;
            let grid = range
                .rows()
                .map(|row| row.iter().map(Cell::from).collect())
                .collect();
            debug!("Read sheet '{}' ({} rows)", name, range.height());
            sheets.push(Sheet::from_grid(name, grid));
        }
        Ok(Workbook { sheets })
    }

    fn open_csv_dir(dir: &Path) -> PaveResult<Self> {
        let entries = fs::read_dir(dir)
            .map_err(|e| PaveError::file_error("read directory", dir.display().to_string(), e.to_string()))?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut sheets = Vec::new();
        for path in paths {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let file = File::open(&path)
                .map_err(|e| PaveError::file_error("open", path.display().to_string(), e.to_string()))?;
            sheets.push(Sheet::from_csv_reader(name, file)?);
        }
        Ok(Workbook { sheets })
    }

    /// Look up a sheet by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic_sheet() -> Sheet {
        Sheet::from_grid(
            "Traffic",
            vec![
                vec![
                    Cell::Text("Axle_Loads".into()),
                    Cell::Text("Traffic_Growth_Rate".into()),
                    Cell::Text("Analysis_Period".into()),
                ],
                vec![Cell::Number(80.0), Cell::Number(0.02), Cell::Number(20.0)],
                vec![Cell::Number(100.0), Cell::Empty, Cell::Empty],
                vec![Cell::Empty, Cell::Empty, Cell::Empty],
                vec![Cell::Text("120".into()), Cell::Empty, Cell::Empty],
            ],
        )
    }

    #[test]
    fn test_blank_rows_dropped() {
        assert_eq!(traffic_sheet().rows.len(), 3);
    }

    #[test]
    fn test_column_skips_blanks_and_parses_text() {
        let loads = traffic_sheet().column_f64("Axle_Loads").unwrap();
        assert_eq!(loads, vec![80.0, 100.0, 120.0]);
    }

    #[test]
    fn test_first_row_scalar() {
        let sheet = traffic_sheet();
        assert_eq!(sheet.first_f64("Analysis_Period").unwrap(), 20.0);
        assert!((sheet.first_f64("Traffic_Growth_Rate").unwrap() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_missing_column_names_field() {
        let err = traffic_sheet().first_f64("Rainfall").unwrap_err();
        assert_eq!(err, PaveError::missing_field("Rainfall"));
    }

    #[test]
    fn test_non_numeric_names_field() {
        let sheet = Sheet::new(
            "Climate",
            vec!["Rainfall".to_string()],
            vec![vec![Cell::Text("lots".into())]],
        );
        match sheet.first_f64("Rainfall").unwrap_err() {
            PaveError::InvalidInput { field, value, .. } => {
                assert_eq!(field, "Rainfall");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_csv_reader() {
        let csv = "Modulus,CBR\n3000,10\n";
        let sheet = Sheet::from_csv_reader("subgrade", csv.as_bytes()).unwrap();
        assert_eq!(sheet.headers, vec!["Modulus", "CBR"]);
        assert_eq!(sheet.first_f64("Modulus").unwrap(), 3000.0);
    }

    #[test]
    fn test_csv_directory_workbook() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("subgrade.csv"), "Modulus,CBR\n3000,10\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let workbook = Workbook::open(dir.path()).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert!(workbook.get("Subgrade").is_some());
    }

    #[test]
    fn test_unreadable_workbook_is_file_error() {
        let err = Workbook::open(Path::new("/nonexistent/inputs.xlsx")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_xlsx_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/design_inputs.xlsx");
        let workbook = Workbook::open(&path).unwrap();
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Traffic", "Climate", "Subgrade", "Materials"]);

        let traffic = workbook.get("traffic").unwrap();
        assert_eq!(traffic.column_f64("Axle_Loads").unwrap(), vec![80.0, 100.0, 120.0]);
        assert_eq!(traffic.first_f64("Analysis_Period").unwrap(), 15.0);
    }
}
