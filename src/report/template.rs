use super::context::TemplateContext;
use super::evaluator::Evaluator;
use super::lexer::lex;
use super::parser::{Node, Parser};
use crate::error::{TabulaError, TabulaResult};

/// A parsed cell template, ready to render against any context
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> TabulaResult<Self> {
        let segments = lex(source).map_err(|e| TabulaError::Template(e.to_string()))?;
        let nodes = Parser::new(segments)
            .parse()
            .map_err(|e| TabulaError::Template(e.to_string()))?;
        Ok(Self { nodes })
    }

    pub fn render(&self, context: &TemplateContext) -> TabulaResult<String> {
        Evaluator::new(context.root()).render(&self.nodes)
    }

    /// Render and split into trimmed, non-blank lines
    pub fn render_lines(&self, context: &TemplateContext) -> TabulaResult<Vec<String>> {
        Ok(self
            .render(context)?
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
