//! Template evaluator
//!
//! Walks parsed nodes against a JSON context. `.` is the current value, which
//! `range` rebinds to each element; `$` always refers to the root.

use super::context::{is_truthy, kind_name, render_value, resolve_path};
use super::parser::{Expr, Node};
use crate::error::{TabulaError, TabulaResult};
use serde_json::Value;
use std::borrow::Cow;

pub struct Evaluator<'a> {
    root: &'a Value,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Render `nodes` with the root as the current value
    pub fn render(&self, nodes: &[Node]) -> TabulaResult<String> {
        let mut out = String::new();
        self.render_nodes(nodes, self.root, &mut out)?;
        Ok(out)
    }

    fn render_nodes(&self, nodes: &[Node], dot: &Value, out: &mut String) -> TabulaResult<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(expr) => out.push_str(&render_value(&*self.eval(expr, dot)?)),
                Node::If {
                    expr,
                    body,
                    else_body,
                } => {
                    if is_truthy(&*self.eval(expr, dot)?) {
                        self.render_nodes(body, dot, out)?;
                    } else {
                        self.render_nodes(else_body, dot, out)?;
                    }
                }
                Node::Range {
                    expr,
                    body,
                    else_body,
                } => {
                    let value = self.eval(expr, dot)?;
                    let items: Vec<&Value> = match &*value {
                        Value::Null => Vec::new(),
                        Value::Array(items) => items.iter().collect(),
                        Value::Object(map) => map.values().collect(),
                        other => {
                            return Err(TabulaError::Template(format!(
                                "range can't iterate over {}",
                                kind_name(other)
                            )))
                        }
                    };

                    if items.is_empty() {
                        self.render_nodes(else_body, dot, out)?;
                    }
                    for item in items {
                        self.render_nodes(body, item, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn eval<'v>(&'v self, expr: &Expr, dot: &'v Value) -> TabulaResult<Cow<'v, Value>> {
        Ok(match expr {
            Expr::Dot(path) => Cow::Borrowed(resolve_path(dot, path.as_slice())?),
            Expr::Root(path) => Cow::Borrowed(resolve_path(self.root, path.as_slice())?),
            Expr::Text(s) => Cow::Owned(Value::String(s.clone())),
            Expr::Int(i) => Cow::Owned(Value::from(*i)),
            Expr::Float(f) => Cow::Owned(Value::from(*f)),
            Expr::Bool(b) => Cow::Owned(Value::Bool(*b)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::lex;
    use super::super::parser::Parser;
    use super::*;
    use serde_json::json;

    fn render(source: &str, data: Value) -> TabulaResult<String> {
        let nodes = Parser::new(lex(source).unwrap()).parse().unwrap();
        Evaluator::new(&data).render(&nodes)
    }

    #[test]
    fn test_render_fields() {
        let out = render("{{.A}}-{{.B.C}}", json!({"A": 1, "B": {"C": "x"}})).unwrap();
        assert_eq!(out, "1-x");
    }

    #[test]
    fn test_range_rebinds_dot() {
        let data = json!({"Title": "T", "Items": [{"N": "a"}, {"N": "b"}]});
        let out = render("{{range .Items}}{{.N}}/{{$.Title}}\n{{end}}", data).unwrap();
        assert_eq!(out, "a/T\nb/T\n");
    }

    #[test]
    fn test_range_over_object_and_null() {
        assert_eq!(render("{{range .}}{{.}}{{end}}", json!({"a": 1, "b": 2})).unwrap(), "12");
        assert_eq!(
            render("{{range .X}}y{{else}}empty{{end}}", json!({"X": null})).unwrap(),
            "empty"
        );
    }

    #[test]
    fn test_range_over_scalar_fails() {
        let err = render("{{range .X}}{{end}}", json!({"X": 3})).unwrap_err();
        assert!(err.to_string().contains("range can't iterate over a number"));
    }

    #[test]
    fn test_if_else() {
        let source = "{{if .Ok}}yes{{else}}no{{end}}";
        assert_eq!(render(source, json!({"Ok": true})).unwrap(), "yes");
        assert_eq!(render(source, json!({"Ok": 0})).unwrap(), "no");
    }

    #[test]
    fn test_literals() {
        assert_eq!(render("{{\"a\"}}{{3}}{{true}}", json!({})).unwrap(), "a3true");
    }

    #[test]
    fn test_missing_field_errors() {
        let err = render("{{.Missing}}", json!({})).unwrap_err();
        assert!(matches!(err, TabulaError::Template(_)));
    }
}
