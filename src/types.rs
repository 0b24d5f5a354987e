use chrono::NaiveDateTime;
use std::fmt;

/// Canonical text form of date-time cells, both directions
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

//==============================================================================
// Field Types
//==============================================================================

/// Semantic type of a record field, as far as cells are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Float,
    DateTime,
    /// Anything the coercion engine has no parser for
    Unsupported,
}

impl FieldType {
    /// Short hint shown in the optional reminder row under the header
    pub fn format_hint(&self) -> &'static str {
        match self {
            FieldType::String => "text",
            FieldType::Integer => "integer",
            FieldType::Boolean => "true / false",
            FieldType::Float => "number",
            FieldType::DateTime => "YYYY-MM-DD HH:MM:SS",
            FieldType::Unsupported => "",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Float => "float",
            FieldType::DateTime => "date-time",
            FieldType::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

//==============================================================================
// Cell Values
//==============================================================================

/// A typed value travelling between a record field and a sheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell, or the zero value of an unsupported type
    #[default]
    Empty,
    Text(String),
    Int(i64),
    /// Unsigned integer above `i64::MAX`
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Local wall-clock time
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Zero values render as blank cells on export
    pub fn is_zero(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Int(i) => *i == 0,
            CellValue::UInt(u) => *u == 0,
            CellValue::Float(f) => *f == 0.0,
            CellValue::Bool(b) => !*b,
            CellValue::DateTime(dt) => *dt == NaiveDateTime::default(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::UInt(u) => write!(f, "{}", u),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}
