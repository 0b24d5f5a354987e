//! Read side of the workbook backend, on top of `calamine`
//!
//! All row and column numbers here are 1-based, like the sheet's own
//! coordinates, regardless of where the used range starts.

use super::coordinates::{parse_cell_name, to_letters};
use crate::error::{TabulaError, TabulaResult};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

/// An opened workbook; dropping it releases the backend handle
pub struct WorkbookReader {
    inner: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookReader {
    pub fn from_bytes(bytes: &[u8]) -> TabulaResult<Self> {
        let inner: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| TabulaError::MalformedWorkbook(format!("cannot open workbook: {}", e)))?;
        Ok(Self { inner })
    }

    pub fn from_path(path: &Path) -> TabulaResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names().to_vec()
    }

    /// Values of one sheet
    pub fn sheet(&mut self, name: &str) -> TabulaResult<SheetReader> {
        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|e| TabulaError::MalformedWorkbook(format!("sheet '{}': {}", name, e)))?;
        let table_last_row = self.table_last_row(name)?;
        Ok(SheetReader {
            name: name.to_string(),
            range,
            table_last_row,
        })
    }

    /// Last row covered by a table on the sheet, 0 when it has none.
    ///
    /// Blank rows at the bottom of a table are not part of the used range,
    /// so this is what keeps them visible to readers.
    pub fn table_last_row(&mut self, name: &str) -> TabulaResult<u32> {
        self.inner
            .load_tables()
            .map_err(|e| TabulaError::MalformedWorkbook(format!("tables: {}", e)))?;
        let tables: Vec<String> = self
            .inner
            .table_names_in_sheet(name)
            .into_iter()
            .cloned()
            .collect();

        let mut last_row = 0;
        for table in tables {
            let table = self.inner.table_by_name(&table).map_err(|e| {
                TabulaError::MalformedWorkbook(format!("table '{}': {}", table, e))
            })?;
            if let Some((row, _)) = table.data().end() {
                last_row = last_row.max(row + 1);
            }
        }
        Ok(last_row)
    }

    /// Formulas of one sheet (without the leading '='), if it has any
    pub fn formulas(&mut self, name: &str) -> Option<Range<String>> {
        self.inner.worksheet_formula(name).ok()
    }
}

/// Values of a single sheet
pub struct SheetReader {
    name: String,
    range: Range<Data>,
    table_last_row: u32,
}

impl SheetReader {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &Range<Data> {
        &self.range
    }

    /// Last used row number, counting rows covered by a table; 0 for an empty sheet
    pub fn last_row(&self) -> u32 {
        self.range
            .end()
            .map(|(row, _)| row + 1)
            .unwrap_or(0)
            .max(self.table_last_row)
    }

    /// Last used column number, 0 for an empty sheet
    pub fn last_column(&self) -> u32 {
        self.range.end().map(|(_, col)| col + 1).unwrap_or(0)
    }

    /// Texts of a row from column A to the last used column
    pub fn row_texts(&self, row: u32) -> Vec<String> {
        (1..=self.last_column())
            .map(|col| self.text_at(row, col))
            .collect()
    }

    /// Every row from 1 to the last used row, as texts
    pub fn rows(&self) -> impl Iterator<Item = (u32, Vec<String>)> + '_ {
        (1..=self.last_row()).map(move |row| (row, self.row_texts(row)))
    }

    /// Text of a cell addressed like "B3"; blank for cells outside the used range
    pub fn cell_value(&self, coordinate: &str) -> TabulaResult<String> {
        let (col, row) = parse_cell_name(coordinate)?;
        let col = u32::try_from(col).map_err(|_| {
            TabulaError::InvalidArgument(format!("column out of range in {}", coordinate))
        })?;
        Ok(self.text_at(row, col))
    }

    /// Header coordinates: (column letter, text) for each non-blank cell of a row
    pub fn header_cells(&self, row: u32) -> TabulaResult<Vec<(String, String)>> {
        let mut cells = Vec::new();
        for (idx, text) in self.row_texts(row).into_iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            cells.push((to_letters(idx as i64 + 1)?, text));
        }
        Ok(cells)
    }

    fn text_at(&self, row: u32, col: u32) -> String {
        if row == 0 || col == 0 {
            return String::new();
        }
        self.range
            .get_value((row - 1, col - 1))
            .map(data_to_text)
            .unwrap_or_default()
    }
}

/// Cell text as a reader sees it
pub fn data_to_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("data").unwrap();
        worksheet.write_string(0, 0, "Title").unwrap();
        worksheet.write_string(1, 0, "Name").unwrap();
        worksheet.write_string(1, 2, "Age").unwrap();
        worksheet.write_string(2, 0, "Jason").unwrap();
        worksheet.write_number(2, 2, 20.0).unwrap();
        worksheet.write_boolean(3, 1, true).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_garbage_bytes_are_malformed() {
        let result = WorkbookReader::from_bytes(b"definitely not a zip file");
        assert!(matches!(result, Err(TabulaError::MalformedWorkbook(_))));
    }

    #[test]
    fn test_missing_sheet_is_malformed() {
        let mut workbook = WorkbookReader::from_bytes(&sample_bytes()).unwrap();
        assert!(matches!(
            workbook.sheet("nope"),
            Err(TabulaError::MalformedWorkbook(_))
        ));
    }

    #[test]
    fn test_rows_and_cells() {
        let mut workbook = WorkbookReader::from_bytes(&sample_bytes()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["data".to_string()]);

        let sheet = workbook.sheet("data").unwrap();
        assert_eq!(sheet.last_row(), 4);
        assert_eq!(sheet.last_column(), 3);
        assert_eq!(sheet.row_texts(3), vec!["Jason", "", "20"]);
        assert_eq!(sheet.cell_value("C3").unwrap(), "20");
        assert_eq!(sheet.cell_value("B4").unwrap(), "true");
        assert_eq!(sheet.cell_value("Z99").unwrap(), "");
        assert_eq!(sheet.rows().count(), 4);
    }

    #[test]
    fn test_table_keeps_trailing_blank_rows() {
        use rust_xlsxwriter::{Table, TableColumn};

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("data").unwrap();
        worksheet.write_string(0, 0, "Name").unwrap();
        worksheet.write_string(1, 0, "Jason").unwrap();
        let columns = vec![TableColumn::new().set_header("Name")];
        let table = Table::new().set_columns(&columns);
        worksheet.add_table(0, 0, 3, 0, &table).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut workbook = WorkbookReader::from_bytes(&bytes).unwrap();
        assert_eq!(workbook.table_last_row("data").unwrap(), 4);
        let sheet = workbook.sheet("data").unwrap();
        assert_eq!(sheet.last_row(), 4);
        assert_eq!(sheet.row_texts(4), vec![""]);
    }

    #[test]
    fn test_sheet_without_tables() {
        let mut workbook = WorkbookReader::from_bytes(&sample_bytes()).unwrap();
        assert_eq!(workbook.table_last_row("data").unwrap(), 0);
    }

    #[test]
    fn test_header_cells_skip_blanks() {
        let mut workbook = WorkbookReader::from_bytes(&sample_bytes()).unwrap();
        let sheet = workbook.sheet("data").unwrap();
        assert_eq!(
            sheet.header_cells(2).unwrap(),
            vec![
                ("A".to_string(), "Name".to_string()),
                ("C".to_string(), "Age".to_string())
            ]
        );
    }
}
