//! Excel importer implementation - .xlsx → typed records
//!
//! The header row (row 2) decides which schema columns are present; columns
//! missing from it are left at their zero value. Cells that do not parse
//! degrade to zero values, while a record type that cannot take a value
//! aborts the whole import.

use super::coerce::cell_to_value;
use super::sheet_reader::{SheetReader, WorkbookReader};
use crate::config::ExcelOptions;
use crate::error::TabulaResult;
use crate::schema::{Record, Schema};
use std::path::Path;
use tracing::{debug, info, warn};

/// Row holding the column headers, right under the title
pub const HEADER_ROW: u32 = 2;

/// Excel importer for filling `Vec`s of records
pub struct ExcelImporter {
    options: ExcelOptions,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new(options: ExcelOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExcelOptions {
        &self.options
    }

    /// Import the configured sheet from .xlsx bytes, appending to `dest`.
    /// Returns the number of records appended.
    pub fn import<R: Record>(&self, bytes: &[u8], dest: &mut Vec<R>) -> TabulaResult<usize> {
        let mut workbook = WorkbookReader::from_bytes(bytes)?;
        self.import_from(&mut workbook, dest)
    }

    /// Import the configured sheet from an .xlsx file
    pub fn import_path<R: Record>(&self, path: &Path, dest: &mut Vec<R>) -> TabulaResult<usize> {
        let mut workbook = WorkbookReader::from_path(path)?;
        self.import_from(&mut workbook, dest)
    }

    fn import_from<R: Record>(
        &self,
        workbook: &mut WorkbookReader,
        dest: &mut Vec<R>,
    ) -> TabulaResult<usize> {
        self.options.validate()?;
        let sheet = workbook.sheet(&self.options.sheet_name)?;
        self.import_sheet(&sheet, dest)
    }

    /// Bind header cells, then build one record per data row
    pub fn import_sheet<R: Record>(
        &self,
        sheet: &SheetReader,
        dest: &mut Vec<R>,
    ) -> TabulaResult<usize> {
        let mut schema = Schema::extract::<R>()?;
        let bound = Self::bind_header(&mut schema, sheet)?;

        for column in schema.unbound_columns() {
            warn!(
                column = %column.natural_name,
                sheet = %sheet.name(),
                "column not found in header row, leaving field at zero value"
            );
        }
        debug!(bound, sheet = %sheet.name(), "header bound");

        let first_data_row = self.options.skip_rows() + 1;
        let last_row = sheet.last_row();
        let mut records = Vec::new();

        for row in first_data_row..=last_row {
            let mut record = R::default();
            for column in schema.bound_columns() {
                let Some(coordinate) = column.bound_coordinate.as_deref() else {
                    continue;
                };
                let text = sheet.cell_value(&format!("{}{}", coordinate, row))?;
                let value = cell_to_value(&text, column.field_type);
                record.set(&column.field_id, value)?;
            }
            records.push(record);
        }

        // Nothing reaches `dest` unless every row bound
        let imported = records.len();
        dest.extend(records);

        info!(sheet = %sheet.name(), records = imported, "import complete");
        Ok(imported)
    }

    /// Match header texts against natural names; returns how many columns bound
    fn bind_header(schema: &mut Schema, sheet: &SheetReader) -> TabulaResult<usize> {
        let mut bound = 0;
        for (coordinate, text) in sheet.header_cells(HEADER_ROW)? {
            if schema.bind(&text, coordinate) {
                bound += 1;
            }
        }
        Ok(bound)
    }
}
