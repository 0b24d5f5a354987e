//! Data a report template is rendered against
//!
//! Any `Serialize` value becomes a JSON-shaped tree of records, sequences and
//! scalars, which templates walk with dotted paths.

use crate::error::{TabulaError, TabulaResult};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateContext {
    root: Value,
}

impl TemplateContext {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Build a context from any serializable value
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> TabulaResult<Self> {
        Ok(Self::new(serde_json::to_value(data)?))
    }

    /// Load a context from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: &Path) -> TabulaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let root = if is_json {
            serde_json::from_str(&content)?
        } else {
            // YAML is a superset of JSON for our purposes
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;
            serde_json::to_value(yaml)?
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a dotted path such as `.Company.Name` from the root
    pub fn resolve(&self, path: &str) -> TabulaResult<&Value> {
        let segments: Vec<&str> = path
            .trim_start_matches('.')
            .split('.')
            .filter(|s| !s.is_empty())
            .collect();
        resolve_path(&self.root, &segments)
    }
}

impl From<Value> for TemplateContext {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Walk `segments` down from `base`; every segment must name a record field
pub fn resolve_path<'a, S: AsRef<str>>(base: &'a Value, segments: &[S]) -> TabulaResult<&'a Value> {
    let mut current = base;
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment).ok_or_else(|| {
                TabulaError::Template(format!("field '{}' not found in context", segment))
            })?,
            other => {
                return Err(TabulaError::Template(format!(
                    "cannot read field '{}' of {}",
                    segment,
                    kind_name(other)
                )))
            }
        };
    }
    Ok(current)
}

/// Text a value renders as inside a cell
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Template truthiness: empty and zero values are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Company {
        #[serde(rename = "Name")]
        name: String,
        #[serde(rename = "Staff")]
        staff: Vec<String>,
    }

    #[test]
    fn test_from_serialize_and_resolve() {
        let ctx = TemplateContext::from_serialize(&Company {
            name: "RoyalBit".to_string(),
            staff: vec!["Ana".to_string()],
        })
        .unwrap();

        assert_eq!(ctx.resolve(".Name").unwrap(), &json!("RoyalBit"));
        assert_eq!(ctx.resolve(".Staff").unwrap(), &json!(["Ana"]));
        assert_eq!(ctx.resolve(".").unwrap(), ctx.root());
    }

    #[test]
    fn test_missing_field_is_template_error() {
        let ctx = TemplateContext::new(json!({"a": {"b": 1}}));
        assert!(matches!(ctx.resolve(".a.c"), Err(TabulaError::Template(_))));
        let err = ctx.resolve(".a.b.c").unwrap_err();
        assert!(err.to_string().contains("cannot read field 'c' of a number"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!(null)), "");
        assert_eq!(render_value(&json!(20)), "20");
        assert_eq!(render_value(&json!(2.5)), "2.5");
        assert_eq!(render_value(&json!("x")), "x");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(0.1)));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!([0])));
    }

    #[test]
    fn test_from_yaml_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "Title: Q1\nItems:\n  - Name: a\n  - Name: b").unwrap();

        let ctx = TemplateContext::from_file(file.path()).unwrap();
        assert_eq!(ctx.resolve(".Title").unwrap(), &json!("Q1"));
        assert_eq!(ctx.resolve(".Items").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_from_json_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"Total": 12.5}}"#).unwrap();

        let ctx = TemplateContext::from_file(file.path()).unwrap();
        assert_eq!(ctx.resolve(".Total").unwrap(), &json!(12.5));
    }
}
