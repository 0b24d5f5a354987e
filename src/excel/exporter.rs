//! Excel exporter implementation - typed records → .xlsx
//!
//! Sheet layout:
//! - row 1: title, merged across every column
//! - row 2: header (natural names in column order)
//! - row 3: optional reminder row with per-column format hints
//! - then one row per record, in input order

use super::coerce::value_to_cell;
use super::coordinates::to_letters;
use super::row_writer::RowWriter;
use crate::config::ExcelOptions;
use crate::error::{TabulaError, TabulaResult};
use crate::schema::{Record, Schema};
use crate::types::CellValue;
use rust_xlsxwriter::{Color, Format, FormatAlign, TableStyle, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_COLUMN_WIDTH: f64 = 20.0;
const TITLE_ROW_HEIGHT: f64 = 30.0;

/// Excel exporter for slices of records
pub struct ExcelExporter {
    options: ExcelOptions,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(options: ExcelOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExcelOptions {
        &self.options
    }

    /// Export records to an in-memory .xlsx file
    pub fn export_to_bytes<R: Record>(&self, records: &[R]) -> TabulaResult<Vec<u8>> {
        let mut workbook = self.build_workbook(records)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Export records to an .xlsx file at `path`
    pub fn export_to_path<R: Record>(&self, records: &[R], path: &Path) -> TabulaResult<()> {
        let mut workbook = self.build_workbook(records)?;
        workbook.save(path)?;
        info!(path = %path.display(), "workbook saved");
        Ok(())
    }

    /// Export records to `<sheet_name>.xlsx` in the working directory
    pub fn export_to_file<R: Record>(&self, records: &[R]) -> TabulaResult<PathBuf> {
        let path = PathBuf::from(format!("{}.xlsx", self.options.sheet_name));
        self.export_to_path(records, &path)?;
        Ok(path)
    }

    /// Lay out title, header and data rows in a fresh workbook
    fn build_workbook<R: Record>(&self, records: &[R]) -> TabulaResult<Workbook> {
        self.options.validate()?;
        let schema = Schema::extract::<R>()?;
        debug!(
            sheet = %self.options.sheet_name,
            columns = schema.len(),
            records = records.len(),
            "exporting records"
        );

        let span = to_letters(schema.len() as i64)?;
        let column_count = u16::try_from(schema.len()).map_err(|_| {
            TabulaError::InvalidModel(format!("{} columns do not fit a sheet", schema.len()))
        })?;
        let data_start = self.options.skip_rows() + 1;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.options.sheet_name)?;

        let last_row = {
            let mut writer = RowWriter::new(worksheet, self.options.stream_batch_size);
            writer.set_column_width(1, column_count, DEFAULT_COLUMN_WIDTH)?;

            // Title band
            let title_format = if self.options.custom_style {
                Format::new()
            } else {
                Self::title_format()
            };
            writer.merge_cells("A1", &format!("{}1", span), &self.options.title, &title_format)?;
            if !self.options.custom_style {
                writer.set_row_height(1, TITLE_ROW_HEIGHT)?;
            }

            let headers = schema.header_names();
            writer.set_row(
                "A2",
                headers
                    .iter()
                    .map(|h| CellValue::Text(h.to_string()))
                    .collect(),
            )?;

            if self.options.show_remind {
                writer.set_row(
                    "A3",
                    schema
                        .columns()
                        .iter()
                        .map(|c| CellValue::Text(c.field_type.format_hint().to_string()))
                        .collect(),
                )?;
            }

            let mut row = data_start;
            for record in records {
                let values = Self::row_values(&schema, record)?;
                writer.set_row(&format!("A{}", row), values)?;
                row += 1;
            }
            writer.flush()?;
            let last_row = row - 1;

            // The table range also marks trailing all-zero records, which
            // leave no cells behind
            if !records.is_empty() {
                let style = if self.options.custom_style {
                    TableStyle::None
                } else {
                    TableStyle::Medium2
                };
                writer.add_table("A2", &format!("{}{}", span, last_row), &headers, style)?;
            }

            debug!(rows = writer.rows_written(), "rows flushed");
            last_row
        };

        worksheet.set_active(true);
        info!(
            sheet = %self.options.sheet_name,
            records = records.len(),
            last_row,
            "export complete"
        );

        Ok(workbook)
    }

    /// Cell values of one record in column order
    fn row_values<R: Record>(schema: &Schema, record: &R) -> TabulaResult<Vec<CellValue>> {
        schema
            .columns()
            .iter()
            .map(|column| {
                record
                    .get(&column.field_id)
                    .map(|value| value_to_cell(&value))
                    .ok_or_else(|| {
                        TabulaError::field_binding(&column.field_id, "field is not readable")
                    })
            })
            .collect()
    }

    fn title_format() -> Format {
        Format::new()
            .set_bold()
            .set_font_size(25)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(0xDFEBF6))
    }
}
