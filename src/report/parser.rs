//! Template parser
//!
//! Turns lexed segments into a tree of text, output, `range` and `if` nodes.

use super::lexer::Segment;

/// A value-producing expression inside an action
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `.` or `.A.B`, relative to the current value
    Dot(Vec<String>),
    /// `$` or `$.A.B`, relative to the root context
    Root(Vec<String>),
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Output(Expr),
    Range {
        expr: Expr,
        body: Vec<Node>,
        else_body: Vec<Node>,
    },
    If {
        expr: Expr,
        body: Vec<Node>,
        else_body: Vec<Node>,
    },
}

/// Error during parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// Index of the offending segment
    pub segment: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, segment: usize) -> Self {
        Self {
            message: message.into(),
            segment,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (action {})", self.message, self.segment + 1)
    }
}

impl std::error::Error for ParseError {}

/// What closed a list of nodes
#[derive(Debug, PartialEq)]
enum Terminator {
    Else,
    End,
    Eof,
}

/// Parser for lexed segments
pub struct Parser {
    segments: Vec<Segment>,
    position: usize,
}

impl Parser {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            position: 0,
        }
    }

    /// Parse the whole template
    pub fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        let (nodes, terminator) = self.parse_list()?;
        match terminator {
            Terminator::Eof => Ok(nodes),
            Terminator::Else => Err(ParseError::new("unexpected {{else}}", self.position - 1)),
            Terminator::End => Err(ParseError::new("unexpected {{end}}", self.position - 1)),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), ParseError> {
        let mut nodes = Vec::new();

        while self.position < self.segments.len() {
            let index = self.position;
            self.position += 1;

            let action = match &self.segments[index] {
                Segment::Text(text) => {
                    nodes.push(Node::Text(text.clone()));
                    continue;
                }
                Segment::Action(action) => action.clone(),
            };

            let (keyword, rest) = split_keyword(&action);
            match keyword {
                "end" if rest.is_empty() => return Ok((nodes, Terminator::End)),
                "else" if rest.is_empty() => return Ok((nodes, Terminator::Else)),
                "range" | "if" => {
                    if rest.is_empty() {
                        return Err(ParseError::new(
                            format!("missing value for {{{{{}}}}}", keyword),
                            index,
                        ));
                    }
                    let expr = parse_expr(rest).map_err(|m| ParseError::new(m, index))?;
                    let (body, else_body) = self.parse_block(keyword, index)?;
                    nodes.push(if keyword == "range" {
                        Node::Range {
                            expr,
                            body,
                            else_body,
                        }
                    } else {
                        Node::If {
                            expr,
                            body,
                            else_body,
                        }
                    });
                }
                _ => {
                    let expr = parse_expr(&action).map_err(|m| ParseError::new(m, index))?;
                    nodes.push(Node::Output(expr));
                }
            }
        }

        Ok((nodes, Terminator::Eof))
    }

    /// Body and optional else-body of a block opened at segment `start`
    fn parse_block(
        &mut self,
        keyword: &str,
        start: usize,
    ) -> Result<(Vec<Node>, Vec<Node>), ParseError> {
        let (body, terminator) = self.parse_list()?;
        match terminator {
            Terminator::End => Ok((body, Vec::new())),
            Terminator::Else => {
                let (else_body, terminator) = self.parse_list()?;
                match terminator {
                    Terminator::End => Ok((body, else_body)),
                    Terminator::Else => Err(ParseError::new(
                        format!("second {{{{else}}}} in {{{{{}}}}}", keyword),
                        self.position - 1,
                    )),
                    Terminator::Eof => Err(ParseError::new(
                        format!("missing {{{{end}}}} for {{{{{}}}}}", keyword),
                        start,
                    )),
                }
            }
            Terminator::Eof => Err(ParseError::new(
                format!("missing {{{{end}}}} for {{{{{}}}}}", keyword),
                start,
            )),
        }
    }
}

fn split_keyword(action: &str) -> (&str, &str) {
    match action.find(char::is_whitespace) {
        Some(i) => (&action[..i], action[i..].trim()),
        None => (action, ""),
    }
}

/// Parse a single expression: a path, `$` path, or literal
pub fn parse_expr(source: &str) -> Result<Expr, String> {
    let source = source.trim();

    if source == "." {
        return Ok(Expr::Dot(Vec::new()));
    }
    if source == "$" {
        return Ok(Expr::Root(Vec::new()));
    }
    if let Some(path) = source.strip_prefix("$.") {
        return Ok(Expr::Root(parse_path(path, source)?));
    }
    if let Some(path) = source.strip_prefix('.') {
        return Ok(Expr::Dot(parse_path(path, source)?));
    }
    if source.len() >= 2 && source.starts_with('"') && source.ends_with('"') {
        return parse_string(&source[1..source.len() - 1]).map(Expr::Text);
    }
    match source {
        "true" => return Ok(Expr::Bool(true)),
        "false" => return Ok(Expr::Bool(false)),
        _ => {}
    }
    if let Ok(i) = source.parse::<i64>() {
        return Ok(Expr::Int(i));
    }
    if let Ok(f) = source.parse::<f64>() {
        return Ok(Expr::Float(f));
    }

    if source.contains(char::is_whitespace) {
        Err(format!("unsupported expression '{}': functions and pipelines are not available", source))
    } else {
        Err(format!("unexpected '{}'", source))
    }
}

fn parse_path(path: &str, source: &str) -> Result<Vec<String>, String> {
    path.split('.')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_') {
                Ok(segment.to_string())
            } else {
                Err(format!("invalid field path '{}'", source))
            }
        })
        .collect()
}

fn parse_string(body: &str) -> Result<String, String> {
    let mut result = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => return Err(format!("unknown escape '\\{}'", other)),
            None => return Err("unterminated escape".to_string()),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::super::lexer::lex;
    use super::*;

    fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
        Parser::new(lex(source).unwrap()).parse()
    }

    #[test]
    fn test_parse_expr() {
        assert_eq!(parse_expr(".").unwrap(), Expr::Dot(vec![]));
        assert_eq!(
            parse_expr(".Company.Name").unwrap(),
            Expr::Dot(vec!["Company".to_string(), "Name".to_string()])
        );
        assert_eq!(
            parse_expr("$.Title").unwrap(),
            Expr::Root(vec!["Title".to_string()])
        );
        assert_eq!(parse_expr("\"a\\\"b\"").unwrap(), Expr::Text("a\"b".to_string()));
        assert_eq!(parse_expr("42").unwrap(), Expr::Int(42));
        assert_eq!(parse_expr("1.5").unwrap(), Expr::Float(1.5));
        assert_eq!(parse_expr("true").unwrap(), Expr::Bool(true));
        assert_eq!(parse_expr(".姓名").unwrap(), Expr::Dot(vec!["姓名".to_string()]));
    }

    #[test]
    fn test_parse_expr_errors() {
        assert!(parse_expr(".a..b").is_err());
        assert!(parse_expr("Name").is_err());
        assert!(parse_expr("printf \"%d\" .X").unwrap_err().contains("functions"));
    }

    #[test]
    fn test_parse_range_with_else() {
        let nodes = parse("{{range .Items}}{{.}}{{else}}none{{end}}").unwrap();
        assert_eq!(
            nodes,
            vec![Node::Range {
                expr: Expr::Dot(vec!["Items".to_string()]),
                body: vec![Node::Output(Expr::Dot(vec![]))],
                else_body: vec![Node::Text("none".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_nested_blocks() {
        let nodes = parse("{{range .A}}{{if .Ok}}y{{end}}{{end}}tail").unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            Node::Range { body, .. } => assert!(matches!(body[0], Node::If { .. })),
            other => panic!("Expected range, got {:?}", other),
        }
        assert_eq!(nodes[1], Node::Text("tail".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("{{range .A}}x").unwrap_err().message.contains("missing {{end}}"));
        assert!(parse("x{{end}}").unwrap_err().message.contains("unexpected {{end}}"));
        assert!(parse("{{else}}").is_err());
        assert!(parse("{{range}}{{end}}").unwrap_err().message.contains("missing value"));
        assert!(parse("{{if .A}}{{else}}{{else}}{{end}}").is_err());
    }
}
