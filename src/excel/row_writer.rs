//! Buffered row writer over a `rust_xlsxwriter` worksheet
//!
//! Rows are queued with [`RowWriter::set_row`] and handed to the worksheet in
//! batches; [`RowWriter::flush`] must be called before the workbook is saved.

use super::coordinates::parse_cell_name;
use crate::error::{TabulaError, TabulaResult};
use crate::types::CellValue;
use rust_xlsxwriter::{Format, Table, TableColumn, TableStyle, Worksheet};

pub struct RowWriter<'a> {
    worksheet: &'a mut Worksheet,
    pending: Vec<(u32, Vec<CellValue>)>,
    batch_size: usize,
    rows_written: usize,
}

impl<'a> RowWriter<'a> {
    pub fn new(worksheet: &'a mut Worksheet, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            worksheet,
            pending: Vec::with_capacity(batch_size.min(4096)),
            batch_size,
            rows_written: 0,
        }
    }

    /// Set the width of 1-based columns `first..=last`
    pub fn set_column_width(&mut self, first: u16, last: u16, width: f64) -> TabulaResult<()> {
        for col in first.max(1)..=last {
            self.worksheet.set_column_width(col - 1, width)?;
        }
        Ok(())
    }

    /// Merge a rectangular range like ("A1", "D1") and put `value` in it.
    /// A single-cell range is written as a plain cell.
    pub fn merge_cells(
        &mut self,
        top_left: &str,
        bottom_right: &str,
        value: &str,
        format: &Format,
    ) -> TabulaResult<()> {
        let (first_col, first_row) = to_zero_based(top_left)?;
        let (last_col, last_row) = to_zero_based(bottom_right)?;

        if (first_col, first_row) == (last_col, last_row) {
            self.worksheet
                .write_string_with_format(first_row, first_col, value, format)?;
        } else {
            self.worksheet
                .merge_range(first_row, first_col, last_row, last_col, value, format)?;
        }
        Ok(())
    }

    /// 1-based row height
    pub fn set_row_height(&mut self, row: u32, height: f64) -> TabulaResult<()> {
        self.worksheet.set_row_height(row.saturating_sub(1), height)?;
        Ok(())
    }

    /// Queue a row of values starting at a cell such as "A3"
    pub fn set_row(&mut self, start_cell: &str, values: Vec<CellValue>) -> TabulaResult<()> {
        let (col, row) = parse_cell_name(start_cell)?;
        if col != 1 {
            return Err(TabulaError::InvalidArgument(format!(
                "rows must start in column A, got {}",
                start_cell
            )));
        }
        self.pending.push((row, values));
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Write every queued row to the worksheet
    pub fn flush(&mut self) -> TabulaResult<()> {
        for (row, values) in self.pending.drain(..) {
            let row = row - 1;
            for (col, value) in values.iter().enumerate() {
                write_value(self.worksheet, row, col as u16, value)?;
            }
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Add a banded table over a 1-based inclusive range with the given headers
    pub fn add_table(
        &mut self,
        top_left: &str,
        bottom_right: &str,
        headers: &[&str],
        style: TableStyle,
    ) -> TabulaResult<()> {
        let (first_col, first_row) = to_zero_based(top_left)?;
        let (last_col, last_row) = to_zero_based(bottom_right)?;

        let columns: Vec<TableColumn> = headers
            .iter()
            .map(|h| TableColumn::new().set_header(*h))
            .collect();
        let table = Table::new()
            .set_style(style)
            .set_first_column(true)
            .set_last_column(true)
            .set_banded_columns(true)
            .set_columns(&columns);

        self.worksheet
            .add_table(first_row, first_col, last_row, last_col, &table)?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

fn to_zero_based(cell: &str) -> TabulaResult<(u16, u32)> {
    let (col, row) = parse_cell_name(cell)?;
    let col = u16::try_from(col - 1)
        .map_err(|_| TabulaError::InvalidArgument(format!("column out of range in {}", cell)))?;
    Ok((col, row - 1))
}

/// Largest integer magnitude an Excel number holds exactly (2^53)
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Write one value; blank cells are left untouched.
///
/// Integers too large for a float cell are written as text.
pub(crate) fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> TabulaResult<()> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Int(i) if i.unsigned_abs() <= MAX_EXACT_INTEGER => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::UInt(u) if *u <= MAX_EXACT_INTEGER => {
            worksheet.write_number(row, col, *u as f64)?;
        }
        CellValue::Int(_) | CellValue::UInt(_) => {
            worksheet.write_string(row, col, value.to_string())?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(_) => {
            worksheet.write_string(row, col, value.to_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_rows_reach_sheet_only_on_flush() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut writer = RowWriter::new(worksheet, 10);

        writer
            .set_row("A1", vec![CellValue::Text("a".to_string()), CellValue::Int(1)])
            .unwrap();
        writer.set_row("A2", vec![CellValue::Bool(true)]).unwrap();
        assert_eq!(writer.rows_written(), 0);

        writer.flush().unwrap();
        assert_eq!(writer.rows_written(), 2);
    }

    #[test]
    fn test_batch_size_triggers_flush() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut writer = RowWriter::new(worksheet, 2);

        writer.set_row("A1", vec![CellValue::Int(1)]).unwrap();
        writer.set_row("A2", vec![CellValue::Int(2)]).unwrap();
        assert_eq!(writer.rows_written(), 2);
        writer.set_row("A3", vec![CellValue::Int(3)]).unwrap();
        assert_eq!(writer.rows_written(), 2);
    }

    #[test]
    fn test_rows_must_start_in_column_a() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut writer = RowWriter::new(worksheet, 2);
        assert!(writer.set_row("B1", vec![]).is_err());
    }

    #[test]
    fn test_large_integers_are_written_as_text() {
        use crate::excel::WorkbookReader;
        use calamine::Data;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("ints").unwrap();
        let mut writer = RowWriter::new(worksheet, 8);
        writer
            .set_row(
                "A1",
                vec![
                    CellValue::Int(9_007_199_254_740_992),
                    CellValue::Int(9_007_199_254_740_993),
                    CellValue::Int(i64::MIN),
                    CellValue::UInt(u64::MAX),
                ],
            )
            .unwrap();
        writer.flush().unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut reader = WorkbookReader::from_bytes(&bytes).unwrap();
        let sheet = reader.sheet("ints").unwrap();
        assert!(matches!(sheet.range().get_value((0, 0)), Some(Data::Float(_))));
        assert_eq!(sheet.cell_value("B1").unwrap(), "9007199254740993");
        assert_eq!(sheet.cell_value("C1").unwrap(), "-9223372036854775808");
        assert_eq!(sheet.cell_value("D1").unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_single_cell_merge_writes_plain_cell() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut writer = RowWriter::new(worksheet, 2);
        let result = writer.merge_cells("A1", "A1", "Title", &Format::new());
        assert!(result.is_ok());
    }
}
