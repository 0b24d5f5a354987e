//! Export/import options
//!
//! Built in code with [`ExcelOptions::new`] or loaded from a YAML file:
//!
//! ```yaml
//! sheet_name: people
//! title: People
//! show_remind: false
//! custom_style: false
//! stream_batch_size: 1000
//! ```

use crate::error::{TabulaError, TabulaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STREAM_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcelOptions {
    /// Sheet written on export and read on import
    pub sheet_name: String,
    /// Text of the merged title band in row 1
    pub title: String,
    /// A reminder row sits between header and data (import skips 3 rows, not 2)
    #[serde(default)]
    pub show_remind: bool,
    /// Leave title and table unstyled
    #[serde(default)]
    pub custom_style: bool,
    /// Rows buffered before they are handed to the sheet
    #[serde(default = "default_stream_batch_size")]
    pub stream_batch_size: usize,
}

fn default_stream_batch_size() -> usize {
    DEFAULT_STREAM_BATCH_SIZE
}

impl ExcelOptions {
    pub fn new(sheet_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            title: title.into(),
            show_remind: false,
            custom_style: false,
            stream_batch_size: DEFAULT_STREAM_BATCH_SIZE,
        }
    }

    pub fn with_remind(mut self, show_remind: bool) -> Self {
        self.show_remind = show_remind;
        self
    }

    pub fn with_custom_style(mut self, custom_style: bool) -> Self {
        self.custom_style = custom_style;
        self
    }

    pub fn with_stream_batch_size(mut self, rows: usize) -> Self {
        self.stream_batch_size = rows;
        self
    }

    /// Load options from a YAML file
    pub fn from_yaml_file(path: &Path) -> TabulaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> TabulaResult<Self> {
        let options: Self = serde_yaml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Sheet name is required; title may be blank but must be present
    pub fn validate(&self) -> TabulaResult<()> {
        if self.sheet_name.trim().is_empty() {
            return Err(TabulaError::InvalidArgument(
                "sheet_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Rows before the first data row: title + header, plus the reminder row
    pub fn skip_rows(&self) -> u32 {
        if self.show_remind {
            3
        } else {
            2
        }
    }
}
