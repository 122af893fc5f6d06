//! Spreadsheet adapter
//!
//! Holds the first sheet of a workbook as an in-memory grid of text cells
//! addressed by 1-based (row, column) coordinates, the way spreadsheet users
//! count them.
//!
//! # Formats
//!
//! - `.csv` is read and written with the `csv` crate
//! - `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` are read with `calamine`
//! - every non-CSV output is written as an xlsx workbook with `rust_xlsxwriter`

use crate::types::ConsultaError;
use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};

/// Prefix added to the input file name to build the output file name
pub const OUTPUT_PREFIX: &str = "output-";

/// On-disk format of a worksheet, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SheetFormat::Csv,
            _ => SheetFormat::Workbook,
        }
    }
}

/// First sheet of a workbook as a grid of text cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a worksheet from row-major cell values
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Worksheet { rows }
    }

    /// Load the first sheet of the file at `path`
    ///
    /// # Errors
    ///
    /// Returns `Spreadsheet`, `Csv` or `Io` errors when the file cannot be read
    /// or has no sheet.
    pub fn load(path: &Path) -> Result<Self, ConsultaError> {
        match SheetFormat::from_path(path) {
            SheetFormat::Csv => Self::load_csv(path),
            SheetFormat::Workbook => Self::load_workbook(path),
        }
    }

    fn load_csv(path: &Path) -> Result<Self, ConsultaError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Worksheet { rows })
    }

    fn load_workbook(path: &Path) -> Result<Self, ConsultaError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ConsultaError::Spreadsheet {
                message: format!("'{}' has no worksheet", path.display()),
            })??;

        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut sheet = Worksheet::new();
        for (row, col, cell) in range.used_cells() {
            sheet.set(row_offset + row + 1, col_offset + col + 1, cell_text(cell));
        }

        Ok(sheet)
    }

    /// Persist the worksheet to `path`, choosing the format by extension
    ///
    /// # Errors
    ///
    /// Returns `Spreadsheet`, `Csv` or `Io` errors when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConsultaError> {
        match SheetFormat::from_path(path) {
            SheetFormat::Csv => self.save_csv(path),
            SheetFormat::Workbook => self.save_workbook(path),
        }
    }

    fn save_csv(&self, path: &Path) -> Result<(), ConsultaError> {
        let width = self.highest_column();
        let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

        for row in &self.rows {
            let mut record: Vec<&str> = row.iter().map(String::as_str).collect();
            record.resize(width, "");
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn save_workbook(&self, path: &Path) -> Result<(), ConsultaError> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();

        for (row_index, row) in self.rows.iter().enumerate() {
            let row_number = u32::try_from(row_index).map_err(|_| out_of_bounds(row_index))?;
            for (col_index, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col_number = u16::try_from(col_index).map_err(|_| out_of_bounds(col_index))?;
                sheet.write_string(row_number, col_number, value)?;
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    /// Value of the cell at 1-based (`row`, `col`), empty when unset
    pub fn get(&self, row: usize, col: usize) -> &str {
        if row == 0 || col == 0 {
            return "";
        }
        self.rows
            .get(row - 1)
            .and_then(|cells| cells.get(col - 1))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Set the cell at 1-based (`row`, `col`), growing the grid as needed
    ///
    /// Coordinates of zero are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if row == 0 || col == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.into();
    }

    /// 1-based index of the rightmost populated column over the whole sheet
    pub fn highest_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|cells| cells.iter().rposition(|value| !value.is_empty()))
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// 1-based index of the last row with any populated cell
    pub fn highest_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|cells| cells.iter().any(|value| !value.is_empty()))
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Output location for a processed spreadsheet: same directory, `output-` prefix
pub fn output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", OUTPUT_PREFIX, file_name))
}

/// Render a cell as text; whole numbers lose their `.0` so identifiers survive
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.to_string(),
    }
}

fn out_of_bounds(index: usize) -> ConsultaError {
    ConsultaError::Spreadsheet {
        message: format!("cell index {} exceeds the xlsx grid", index),
    }
}
