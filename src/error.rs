use thiserror::Error;

pub type TabulaResult<T> = Result<T, TabulaError>;

#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Input is not record-shaped (no tagged fields, duplicate headers, ...)
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed workbook: {0}")]
    MalformedWorkbook(String),

    /// Schema and destination type disagree; aborts the whole import
    #[error("Field binding error on '{field}': {reason}")]
    FieldBinding { field: String, reason: String },

    #[error("Template error: {0}")]
    Template(String),
}

impl TabulaError {
    pub fn field_binding(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TabulaError::FieldBinding {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<calamine::XlsxError> for TabulaError {
    fn from(e: calamine::XlsxError) -> Self {
        TabulaError::MalformedWorkbook(e.to_string())
    }
}
