//! Flow matrix loader.
//!
//! Workbooks (`xlsx`, `xlsm`, `xls`, `ods`) go through `calamine`; a `.csv`
//! export of a single sheet goes through `csv`. Both are reduced to a grid of
//! [`RawCell`]s in sheet coordinates, then cut into a [`LabeledMatrix`]: blank
//! lines are dropped, the first remaining row is the header, the first
//! selected column holds the row labels, and blank or error cells are 0.

use crate::domain::model::LabeledMatrix;
use crate::domain::ports::MatrixSource;
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else if let Ok(n) = trimmed.parse::<f64>() {
            RawCell::Number(n)
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    fn label(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.clone(),
        }
    }
}

impl From<&Data> for RawCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => RawCell::Empty,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) => RawCell::parse(s),
            // `#N/A`, `#DIV/0!` and friends read as missing values.
            Data::Error(_) => RawCell::Empty,
            other => RawCell::Text(other.to_string()),
        }
    }
}

/// Loads the flow matrix block of a sheet.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetSource {
    /// Zero-based sheet column indices to read; empty means every column.
    columns: Vec<usize>,
    /// Data rows below the header; `None` reads to the end of the sheet.
    rows: Option<usize>,
}

impl SpreadsheetSource {
    pub fn new(columns: Vec<usize>, rows: Option<usize>) -> Self {
        Self { columns, rows }
    }

    /// Builds a source from a column selection such as `A:L,N:Q`.
    pub fn from_selection(selection: &str, rows: Option<usize>) -> Result<Self> {
        Ok(Self::new(parse_column_selection(selection)?, rows))
    }

    fn read_workbook(&self, path: &Path, sheet_name: &str) -> Result<Vec<Vec<RawCell>>> {
        let mut workbook = open_workbook_auto(path)?;

        let available = workbook.sheet_names();
        if !available.iter().any(|s| s == sheet_name) {
            return Err(EtlError::SheetNotFound {
                sheet: sheet_name.to_string(),
                available,
            });
        }

        let range = workbook.worksheet_range(sheet_name)?;
        let Some((last_row, last_col)) = range.end() else {
            return Ok(Vec::new());
        };

        // Absolute coordinates, so column letters mean the same as in the sheet.
        let grid = (0..=last_row)
            .map(|r| {
                (0..=last_col)
                    .map(|c| range.get_value((r, c)).map(RawCell::from).unwrap_or(RawCell::Empty))
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    fn read_csv(&self, path: &Path, sheet_name: &str) -> Result<Vec<Vec<RawCell>>> {
        tracing::debug!("CSV input holds a single sheet, ignoring sheet name '{}'", sheet_name);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(RawCell::parse).collect());
        }
        Ok(grid)
    }

    /// Cuts the selected block out of a sheet grid.
    pub fn matrix_from_grid(&self, grid: &[Vec<RawCell>]) -> Result<LabeledMatrix> {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let columns: Vec<usize> = if self.columns.is_empty() {
            (0..width).collect()
        } else {
            self.columns.clone()
        };

        fn cell(row: &[RawCell], c: usize) -> RawCell {
            row.get(c).cloned().unwrap_or(RawCell::Empty)
        }

        let Some((&label_column, value_columns)) = columns.split_first() else {
            return Err(EtlError::ProcessingError {
                message: "no columns selected".to_string(),
            });
        };

        // Blank lines inside or above the block are skipped, not read as rows.
        let grid: Vec<&[RawCell]> = grid
            .iter()
            .map(Vec::as_slice)
            .filter(|row| columns.iter().any(|&c| cell(*row, c) != RawCell::Empty))
            .collect();

        let Some((header, body)) = grid.split_first() else {
            return Err(EtlError::ProcessingError {
                message: "sheet is empty".to_string(),
            });
        };

        let column_labels: Vec<String> = value_columns
            .iter()
            .map(|&c| cell(header, c).label())
            .collect();

        let body = match self.rows {
            Some(n) => &body[..n.min(body.len())],
            None => body,
        };

        let mut row_labels = Vec::with_capacity(body.len());
        let mut values = Vec::with_capacity(body.len());
        for row in body {
            let label = cell(row, label_column).label();
            let mut cells = Vec::with_capacity(value_columns.len());
            for (i, &c) in value_columns.iter().enumerate() {
                let value = match cell(row, c) {
                    RawCell::Empty => 0.0,
                    RawCell::Number(n) if n.is_nan() => 0.0,
                    RawCell::Number(n) => n,
                    RawCell::Text(text) => {
                        return Err(EtlError::InvalidCell {
                            row: label,
                            column: column_labels[i].clone(),
                            value: text,
                        })
                    }
                };
                cells.push(value);
            }
            row_labels.push(label);
            values.push(cells);
        }

        let matrix = LabeledMatrix::new(row_labels, column_labels, values);
        if !matrix.is_square() {
            tracing::warn!("Flow matrix is not square: {:?}", matrix.shape());
        }
        Ok(matrix)
    }
}

impl MatrixSource for SpreadsheetSource {
    fn load(&self, path: &Path, sheet_name: &str) -> Result<LabeledMatrix> {
        if !path.is_file() {
            return Err(EtlError::SourceNotFound {
                path: path.display().to_string(),
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let grid = match extension.as_str() {
            "csv" => self.read_csv(path, sheet_name)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => self.read_workbook(path, sheet_name)?,
            _ => {
                return Err(EtlError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };

        tracing::debug!("Read {} sheet rows from {}", grid.len(), path.display());
        self.matrix_from_grid(&grid)
    }
}

/// Parses spreadsheet column letters (`A`, `A:L,N:Q`, `AA:AC`) into
/// zero-based indices, in selection order. Blank selects nothing.
pub fn parse_column_selection(selection: &str) -> Result<Vec<usize>> {
    let invalid = |reason: &str| EtlError::InvalidConfigValueError {
        field: "columns".to_string(),
        value: selection.to_string(),
        reason: reason.to_string(),
    };

    const BAD_COLUMN: &str = "invalid column letter or beyond column XFD";

    let mut columns = Vec::new();
    for part in selection.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once(':') {
            Some((start, end)) => {
                let start = column_index(start).ok_or_else(|| invalid(BAD_COLUMN))?;
                let end = column_index(end).ok_or_else(|| invalid(BAD_COLUMN))?;
                if end < start {
                    return Err(invalid("range end comes before its start"));
                }
                columns.extend(start..=end);
            }
            None => columns.push(column_index(part).ok_or_else(|| invalid(BAD_COLUMN))?),
        }
    }
    Ok(columns)
}

/// Index of the last sheet column, `XFD`.
pub const MAX_COLUMN_INDEX: usize = 16_383;

fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let index = letters.chars().try_fold(0usize, |acc, c| {
        let digit = c.to_ascii_uppercase() as usize - 'A' as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })?;
    (index - 1 <= MAX_COLUMN_INDEX).then_some(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<RawCell>> {
        rows.iter()
            .map(|r| r.iter().map(|c| RawCell::parse(c)).collect())
            .collect()
    }

    #[test]
    fn test_parse_column_selection() {
        assert_eq!(parse_column_selection("A").unwrap(), vec![0]);
        assert_eq!(parse_column_selection("A:C,E").unwrap(), vec![0, 1, 2, 4]);
        assert_eq!(parse_column_selection("z, aa:ab").unwrap(), vec![25, 26, 27]);
        assert!(parse_column_selection("").unwrap().is_empty());

        let full = parse_column_selection("A:L,N:Q").unwrap();
        assert_eq!(full.len(), 16);
        assert!(!full.contains(&12));
    }

    #[test]
    fn test_parse_column_selection_rejects_garbage() {
        assert!(parse_column_selection("A1").is_err());
        assert!(parse_column_selection("C:A").is_err());
        assert!(parse_column_selection("A:").is_err());
    }

    #[test]
    fn test_parse_column_selection_stops_at_last_sheet_column() {
        assert_eq!(parse_column_selection("XFD").unwrap(), vec![MAX_COLUMN_INDEX]);
        assert_eq!(parse_column_selection("XFC:XFD").unwrap().len(), 2);

        for selection in ["XFE", "A:ZZZZZZ", "ZZZZZZZZZZZZZZZ"] {
            let err = parse_column_selection(selection).unwrap_err();
            assert!(
                matches!(err, EtlError::InvalidConfigValueError { ref field, .. } if field == "columns"),
                "{} should be rejected",
                selection
            );
        }
    }

    #[test]
    fn test_matrix_from_grid_blank_cells_are_zero() {
        let source = SpreadsheetSource::default();
        let m = source
            .matrix_from_grid(&grid(&[
                &["", "A", "B"],
                &["A", "1", ""],
                &["B", "-2.5", "3"],
            ]))
            .unwrap();
        assert_eq!(m.row_labels, vec!["A", "B"]);
        assert_eq!(m.column_labels, vec!["A", "B"]);
        assert_eq!(m.values, vec![vec![1.0, 0.0], vec![-2.5, 3.0]]);
    }

    #[test]
    fn test_matrix_from_grid_skips_unselected_columns_and_rows() {
        let source = SpreadsheetSource::from_selection("A:B,D", Some(2)).unwrap();
        let m = source
            .matrix_from_grid(&grid(&[
                &["", "A", "Total", "B"],
                &["A", "1", "99", "2"],
                &["B", "3", "99", "4"],
                &["Notes", "x", "y", "z"],
            ]))
            .unwrap();
        assert_eq!(m.column_labels, vec!["A", "B"]);
        assert_eq!(m.row_labels, vec!["A", "B"]);
        assert_eq!(m.values, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_matrix_from_grid_short_rows_padded() {
        let source = SpreadsheetSource::default();
        let m = source
            .matrix_from_grid(&grid(&[&["", "A", "B"], &["A", "5"]]))
            .unwrap();
        assert_eq!(m.values, vec![vec![5.0, 0.0]]);
    }

    #[test]
    fn test_matrix_from_grid_rejects_text_cells() {
        let source = SpreadsheetSource::default();
        let err = source
            .matrix_from_grid(&grid(&[&["", "A"], &["A", "n/a"]]))
            .unwrap_err();
        assert!(matches!(err, EtlError::InvalidCell { ref value, .. } if value == "n/a"));
    }

    #[test]
    fn test_matrix_from_grid_error_cells_are_zero() {
        let source = SpreadsheetSource::default();
        let mut g = grid(&[&["", "A", "B"], &["A", "", "2"]]);
        g[1][1] = RawCell::from(&Data::Error(calamine::CellErrorType::NA));
        g[1][2] = RawCell::from(&Data::Error(calamine::CellErrorType::Div0));

        let m = source.matrix_from_grid(&g).unwrap();
        assert_eq!(m.values, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_matrix_from_grid_skips_blank_lines() {
        let source = SpreadsheetSource::from_selection("A:C", Some(2)).unwrap();
        let m = source
            .matrix_from_grid(&grid(&[
                &["", "", ""],
                &["", "A", "B"],
                &["A", "1", "2"],
                &["", "", "", "ignored"],
                &["B", "3", "4"],
                &["C", "5", "6"],
            ]))
            .unwrap();
        assert_eq!(m.row_labels, vec!["A", "B"]);
        assert_eq!(m.values, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_load_missing_file() {
        let source = SpreadsheetSource::default();
        let err = source
            .load(Path::new("does/not/exist.xlsx"), "Sheet1")
            .unwrap_err();
        assert!(matches!(err, EtlError::SourceNotFound { .. }));
    }
}
