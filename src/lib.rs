//! Tabula - typed records to Excel sheets and back
//!
//! This library maps tagged record types onto spreadsheet columns and fills
//! report templates from structured data.
//!
//! # Features
//!
//! - Field tags decide column headers and order (`record!` macro)
//! - Export: title band, header row, one row per record, styled table
//! - Import: header-driven column binding, tolerant cell coercion
//! - Reports: `{{ .Field }}` and `{{ range }}` markers inside template workbooks
//!
//! # Example
//!
//! ```no_run
//! use royalbit_tabula::{record, ExcelExporter, ExcelImporter, ExcelOptions};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: String => "姓名",
//!         pub age: i64 => "年龄",
//!     }
//! }
//!
//! let options = ExcelOptions::new("people", "People");
//! let people = vec![Person { name: "Jason".into(), age: 20 }];
//!
//! let bytes = ExcelExporter::new(options.clone()).export_to_bytes(&people)?;
//!
//! let mut back: Vec<Person> = Vec::new();
//! ExcelImporter::new(options).import(&bytes, &mut back)?;
//! assert_eq!(back, people);
//! # Ok::<(), royalbit_tabula::TabulaError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod report;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use config::ExcelOptions;
pub use error::{TabulaError, TabulaResult};
pub use excel::{ExcelExporter, ExcelImporter};
pub use report::{ReportRenderer, TemplateContext};
pub use schema::{Column, FieldSpec, FieldValue, Record, Schema};
pub use types::{CellValue, FieldType};
