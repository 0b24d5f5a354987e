//! Excel import/export for tagged records
//!
//! This module provides bidirectional record ↔ Excel conversion:
//! - Export: `&[R]` → .xlsx (title, header, one row per record)
//! - Import: .xlsx → `Vec<R>` (header-driven column binding)

pub mod coerce;
pub mod coordinates;
mod exporter;
mod importer;
mod row_writer;
mod sheet_reader;

pub use coerce::{cell_to_value, value_to_cell};
pub use coordinates::{cell_name, from_letters, parse_cell_name, to_letters};
pub use exporter::ExcelExporter;
pub use importer::{ExcelImporter, HEADER_ROW};
pub use row_writer::RowWriter;
pub use sheet_reader::{data_to_text, SheetReader, WorkbookReader};
