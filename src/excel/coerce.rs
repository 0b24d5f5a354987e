//! Cell text ⇄ typed field values
//!
//! Reading never fails: a cell that does not parse yields the zero value of the
//! target type, so one bad cell cannot abort a large import.

use crate::types::{CellValue, FieldType, DATETIME_FORMAT};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Extra date-time layouts accepted on import
const DATETIME_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Convert cell text to a value of the given field type
pub fn cell_to_value(text: &str, field_type: FieldType) -> CellValue {
    match field_type {
        FieldType::String => CellValue::Text(text.to_string()),
        FieldType::Integer => parse_integer(text.trim()),
        FieldType::Float => CellValue::Float(text.trim().parse::<f64>().unwrap_or(0.0)),
        FieldType::Boolean => CellValue::Bool(parse_bool(text.trim())),
        FieldType::DateTime => {
            CellValue::DateTime(parse_datetime(text.trim()).unwrap_or_default())
        }
        FieldType::Unsupported => CellValue::Empty,
    }
}

/// Convert a field value to what gets written into the cell.
///
/// Zero values become blank cells and date-times become canonical text.
pub fn value_to_cell(value: &CellValue) -> CellValue {
    if value.is_zero() {
        return CellValue::Empty;
    }
    match value {
        CellValue::DateTime(dt) => CellValue::Text(dt.format(DATETIME_FORMAT).to_string()),
        other => other.clone(),
    }
}

fn parse_integer(text: &str) -> CellValue {
    if let Ok(i) = text.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(u) = text.parse::<u64>() {
        return CellValue::UInt(u);
    }
    // Numeric cells often come back as "20.0"
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => CellValue::Int(f.trunc() as i64),
        _ => CellValue::Int(0),
    }
}

fn parse_bool(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "yes" | "y"
    )
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        return Some(dt);
    }
    for format in DATETIME_FALLBACK_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    // A real date cell reads back as its serial day number
    text.parse::<f64>().ok().and_then(excel_serial_to_datetime)
}

/// Excel serial day number (days since 1899-12-30) to wall-clock time
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
