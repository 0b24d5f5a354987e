//! Report templates: workbooks whose cells carry `{{ … }}` markers
//!
//! A template workbook is loaded once, then rendered against a
//! [`TemplateContext`] into a new workbook. Cells containing a `range` action
//! expand down their column, one row per non-blank rendered line, and push the
//! rest of the sheet down. Other marked cells are replaced in place.

mod context;
mod evaluator;
mod lexer;
mod parser;
mod template;

pub use context::{is_truthy, render_value, resolve_path, TemplateContext};
pub use template::Template;

use crate::error::{TabulaError, TabulaResult};
use crate::excel::{cell_name, WorkbookReader};
use calamine::Data;
use regex::Regex;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const RANGE_MARKER: &str = r"\{\{-?\s*range\b";
const SCALAR_MARKER: &str = r"(?s)\{\{.*?\}\}";
const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, PartialEq)]
enum TemplateCell {
    Value(Data),
    /// Formula text without the leading '='
    Formula(String),
}

/// Cells of one template sheet keyed by 0-based (row, column), row-major
#[derive(Debug, Clone)]
struct TemplateSheet {
    name: String,
    cells: BTreeMap<(u32, u16), TemplateCell>,
}

/// Loaded report template plus the context it renders against
pub struct ReportRenderer {
    sheets: Vec<TemplateSheet>,
    context: TemplateContext,
    range_marker: Regex,
    scalar_marker: Regex,
}

impl ReportRenderer {
    /// Load a template workbook from disk
    pub fn from_path(path: &Path, context: TemplateContext) -> TabulaResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, context)
    }

    /// Load a template workbook from .xlsx bytes
    pub fn from_bytes(bytes: &[u8], context: TemplateContext) -> TabulaResult<Self> {
        let mut workbook = WorkbookReader::from_bytes(bytes)?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            sheets.push(Self::load_sheet(&mut workbook, &name)?);
        }
        debug!(sheets = sheets.len(), "report template loaded");

        Ok(Self {
            sheets,
            context,
            range_marker: Regex::new(RANGE_MARKER)
                .map_err(|e| TabulaError::Template(format!("Regex error: {}", e)))?,
            scalar_marker: Regex::new(SCALAR_MARKER)
                .map_err(|e| TabulaError::Template(format!("Regex error: {}", e)))?,
        })
    }

    fn load_sheet(workbook: &mut WorkbookReader, name: &str) -> TabulaResult<TemplateSheet> {
        let mut cells = BTreeMap::new();

        let sheet = workbook.sheet(name)?;
        let (row0, col0) = sheet.range().start().unwrap_or((0, 0));
        for (row, col, data) in sheet.range().used_cells() {
            let key = absolute_position(name, row0, col0, row, col)?;
            cells.insert(key, TemplateCell::Value(data.clone()));
        }

        // Formula cells also hold a cached value; the formula wins
        if let Some(formulas) = workbook.formulas(name) {
            let (row0, col0) = formulas.start().unwrap_or((0, 0));
            for (row, col, formula) in formulas.used_cells() {
                let key = absolute_position(name, row0, col0, row, col)?;
                cells.insert(key, TemplateCell::Formula(formula.clone()));
            }
        }

        Ok(TemplateSheet {
            name: name.to_string(),
            cells,
        })
    }

    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Render into .xlsx bytes
    pub fn render_to_bytes(&self) -> TabulaResult<Vec<u8>> {
        let mut workbook = self.render()?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Render into an .xlsx file
    pub fn render_to_path(&self, path: &Path) -> TabulaResult<()> {
        let mut workbook = self.render()?;
        workbook.save(path)?;
        info!(path = %path.display(), "report written");
        Ok(())
    }

    fn render(&self) -> TabulaResult<Workbook> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            self.render_sheet(sheet, worksheet, &date_format)?;
        }
        Ok(workbook)
    }

    fn render_sheet(
        &self,
        sheet: &TemplateSheet,
        worksheet: &mut Worksheet,
        date_format: &Format,
    ) -> TabulaResult<()> {
        let mut offset: u32 = 0;
        let mut row_growth: u32 = 0;
        let mut current_row = None;
        let mut expanded = 0;

        for (&(row, col), cell) in &sheet.cells {
            if current_row != Some(row) {
                offset += row_growth;
                row_growth = 0;
                current_row = Some(row);
            }
            let target = row + offset;

            let text = match cell {
                TemplateCell::Formula(formula) => {
                    worksheet.write_formula(target, col, formula.as_str())?;
                    continue;
                }
                TemplateCell::Value(Data::String(text)) => text,
                TemplateCell::Value(data) => {
                    write_data(worksheet, target, col, data, date_format)?;
                    continue;
                }
            };

            if self.range_marker.is_match(text) {
                let lines = Template::parse(text)
                    .and_then(|t| t.render_lines(&self.context))
                    .map_err(|e| cell_error(&sheet.name, row, col, e))?;
                for (i, line) in lines.iter().enumerate() {
                    worksheet.write_string(target + i as u32, col, line)?;
                }
                row_growth = row_growth.max((lines.len() as u32).saturating_sub(1));
                expanded += 1;
            } else if self.scalar_marker.is_match(text) {
                let rendered = Template::parse(text)
                    .and_then(|t| t.render(&self.context))
                    .map_err(|e| cell_error(&sheet.name, row, col, e))?;
                worksheet.write_string(target, col, rendered)?;
            } else {
                worksheet.write_string(target, col, text)?;
            }
        }

        info!(
            sheet = %sheet.name,
            ranges = expanded,
            rows_added = offset + row_growth,
            "sheet rendered"
        );
        Ok(())
    }
}

fn absolute_position(
    sheet: &str,
    row0: u32,
    col0: u32,
    row: usize,
    col: usize,
) -> TabulaResult<(u32, u16)> {
    let row = u32::try_from(row)
        .ok()
        .and_then(|r| r.checked_add(row0));
    let col = u32::try_from(col)
        .ok()
        .and_then(|c| c.checked_add(col0))
        .and_then(|c| u16::try_from(c).ok());
    match (row, col) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(TabulaError::MalformedWorkbook(format!(
            "sheet '{}': cell position out of range",
            sheet
        ))),
    }
}

fn write_data(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    data: &Data,
    date_format: &Format,
) -> TabulaResult<()> {
    match data {
        Data::Empty => {}
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Data::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        Data::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Data::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Data::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, dt.as_f64(), date_format)?;
        }
        Data::Error(e) => {
            worksheet.write_string(row, col, e.to_string())?;
        }
    }
    Ok(())
}

/// Attach the sheet and cell to template failures
fn cell_error(sheet: &str, row: u32, col: u16, error: TabulaError) -> TabulaError {
    match error {
        TabulaError::Template(message) => {
            let cell = cell_name(i64::from(col) + 1, row + 1).unwrap_or_default();
            TabulaError::Template(format!("sheet '{}' cell {}: {}", sheet, cell, message))
        }
        other => other,
    }
}
