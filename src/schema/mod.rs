//! Schema extraction: a record type's tagged fields as an ordered column list
//!
//! One owned `Vec<Column>` in index order, with two lookup views (by field id
//! and by natural name) built alongside it.

mod record;

pub use record::{unknown_field, FieldSpec, FieldValue, Record};

use crate::error::{TabulaError, TabulaResult};
use crate::types::FieldType;
use std::collections::HashMap;

/// One schema entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text shown in the sheet
    pub natural_name: String,
    /// Record field this column reads and writes
    pub field_id: String,
    pub field_type: FieldType,
    /// 0-based position, dense over tagged fields
    pub index: usize,
    /// Sheet column letter, set during import once the header row is found
    pub bound_coordinate: Option<String>,
}

/// Ordered set of columns for one export or import call
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
    by_field: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    /// Extract the schema of a record type.
    ///
    /// Works the same for `R`, `Box<R>` and sequences of either, since the
    /// descriptor belongs to the type and no instance is inspected.
    pub fn extract<R: Record>() -> TabulaResult<Self> {
        Self::from_fields(R::fields(), std::any::type_name::<R>())
    }

    /// Build a schema from a field descriptor list
    pub fn from_fields(fields: &[FieldSpec], type_name: &str) -> TabulaResult<Self> {
        let mut columns = Vec::new();
        let mut by_field = HashMap::new();
        let mut by_name = HashMap::new();

        for spec in fields {
            let Some(tag) = spec.tag else {
                continue;
            };

            // Further tokens are reserved for per-field options
            let natural_name = tag.split_whitespace().next().ok_or_else(|| {
                TabulaError::InvalidModel(format!(
                    "field '{}' of {} has an empty export tag",
                    spec.field, type_name
                ))
            })?;

            let index = columns.len();
            if by_name.insert(natural_name.to_string(), index).is_some() {
                return Err(TabulaError::InvalidModel(format!(
                    "duplicate column header '{}' in {}",
                    natural_name, type_name
                )));
            }
            by_field.insert(spec.field.to_string(), index);

            columns.push(Column {
                natural_name: natural_name.to_string(),
                field_id: spec.field.to_string(),
                field_type: spec.field_type,
                index,
                bound_coordinate: None,
            });
        }

        if columns.is_empty() {
            return Err(TabulaError::InvalidModel(format!(
                "{} has no tagged fields",
                type_name
            )));
        }

        Ok(Self {
            columns,
            by_field,
            by_name,
        })
    }

    /// Columns in index order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn by_field(&self, field_id: &str) -> Option<&Column> {
        self.by_field.get(field_id).map(|&i| &self.columns[i])
    }

    pub fn by_natural_name(&self, natural_name: &str) -> Option<&Column> {
        self.by_name.get(natural_name).map(|&i| &self.columns[i])
    }

    /// Header texts in index order
    pub fn header_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.natural_name.as_str())
            .collect()
    }

    /// Bind the column with this header text to a sheet column letter.
    /// Returns false when no column carries that header.
    pub fn bind(&mut self, natural_name: &str, coordinate: impl Into<String>) -> bool {
        match self.by_name.get(natural_name) {
            Some(&i) => {
                self.columns[i].bound_coordinate = Some(coordinate.into());
                true
            }
            None => false,
        }
    }

    /// Columns that found a header cell, in index order
    pub fn bound_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.bound_coordinate.is_some())
    }

    /// Columns whose header was not found in the sheet
    pub fn unbound_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.bound_coordinate.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    crate::record! {
        #[derive(Debug, Default)]
        struct Person {
            name: String => "姓名",
            internal_id: u64,
            age: i64 => "年龄",
            joined: NaiveDateTime => "入职时间 width:20",
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Untagged {
            a: String,
            b: i64,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Duplicated {
            a: String => "Name",
            b: String => "Name",
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct BlankTag {
            a: String => "   ",
        }
    }

    #[test]
    fn test_extract_skips_untagged_and_counts_densely() {
        let schema = Schema::extract::<Person>().unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.header_names(), vec!["姓名", "年龄", "入职时间"]);

        let age = schema.by_field("age").unwrap();
        assert_eq!(age.index, 1);
        assert_eq!(age.field_type, FieldType::Integer);
        assert!(schema.by_field("internal_id").is_none());
    }

    #[test]
    fn test_two_views_over_same_columns() {
        let schema = Schema::extract::<Person>().unwrap();
        assert_eq!(
            schema.by_natural_name("入职时间"),
            schema.by_field("joined")
        );
    }

    #[test]
    fn test_extract_is_stable() {
        let first = Schema::extract::<Person>().unwrap();
        let again = Schema::extract::<Person>().unwrap();
        let boxed = Schema::extract::<Box<Person>>().unwrap();
        assert_eq!(first.columns(), again.columns());
        assert_eq!(first.columns(), boxed.columns());
    }

    #[test]
    fn test_no_tagged_fields_is_invalid_model() {
        let err = Schema::extract::<Untagged>().unwrap_err();
        assert!(matches!(err, TabulaError::InvalidModel(_)));
    }

    #[test]
    fn test_duplicate_header_is_invalid_model() {
        let err = Schema::extract::<Duplicated>().unwrap_err();
        assert!(err.to_string().contains("duplicate column header 'Name'"));
    }

    #[test]
    fn test_blank_tag_is_invalid_model() {
        let err = Schema::extract::<BlankTag>().unwrap_err();
        assert!(matches!(err, TabulaError::InvalidModel(_)));
    }

    #[test]
    fn test_bind_and_unbound() {
        let mut schema = Schema::extract::<Person>().unwrap();
        assert!(schema.bind("年龄", "C"));
        assert!(!schema.bind("Unknown", "D"));

        let bound: Vec<&str> = schema.bound_columns().map(|c| c.field_id.as_str()).collect();
        assert_eq!(bound, vec!["age"]);
        assert_eq!(schema.unbound_columns().count(), 2);
        assert_eq!(
            schema.by_field("age").unwrap().bound_coordinate.as_deref(),
            Some("C")
        );
    }
}
